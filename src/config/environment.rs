//! Configuración de variables de entorno
//!
//! Este módulo carga la configuración del servicio desde el entorno a
//! un struct explícito que se inyecta por constructor: ningún módulo
//! vuelve a leer variables de entorno después del arranque.

use std::env;

use anyhow::{bail, Context, Result};

use crate::clients::api_client::DEFAULT_TIMEOUT_MS;

/// Intervalo por defecto entre ciclos de sincronización, en segundos
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub database_url: String,
    pub here_api_base_url: String,
    pub here_api_routes_path: String,
    pub here_api_token: String,
    pub integration_enabled: bool,
    pub sync_interval_secs: u64,
    pub request_timeout_ms: u64,
}

impl EnvironmentConfig {
    /// Carga la configuración; la ausencia de cualquier variable
    /// obligatoria es fatal en el arranque
    pub fn from_env() -> Result<Self> {
        let here_api_base_url = env::var("HERE_API_BASE_URL").unwrap_or_default();
        let here_api_routes_path = env::var("HERE_API_ROUTES_PATH").unwrap_or_default();
        let here_api_token = env::var("HERE_API_TOKEN").unwrap_or_default();

        if here_api_base_url.is_empty()
            || here_api_routes_path.is_empty()
            || here_api_token.is_empty()
        {
            bail!(
                "Variables de entorno obligatorias (HERE_API_BASE_URL, \
                 HERE_API_ROUTES_PATH, HERE_API_TOKEN) no fueron definidas"
            );
        }

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL debe estar definida")?;

        let integration_enabled = env::var("HERE_API_INTEGRACAO_ATIVADA")
            .map(|v| v == "true")
            .unwrap_or(true);

        let sync_interval_secs = match env::var("SYNC_INTERVAL_SECS") {
            Ok(raw) => raw
                .parse()
                .context("SYNC_INTERVAL_SECS debe ser un número válido")?,
            Err(_) => DEFAULT_SYNC_INTERVAL_SECS,
        };

        let request_timeout_ms = match env::var("HERE_API_TIMEOUT_MS") {
            Ok(raw) => raw
                .parse()
                .context("HERE_API_TIMEOUT_MS debe ser un número válido")?,
            Err(_) => DEFAULT_TIMEOUT_MS,
        };

        Ok(Self {
            database_url,
            here_api_base_url,
            here_api_routes_path,
            here_api_token,
            integration_enabled,
            sync_interval_secs,
            request_timeout_ms,
        })
    }
}
