//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del ciclo de
//! sincronización con la API de HERE.

use thiserror::Error;

/// Errores principales del servicio de sincronización
#[derive(Error, Debug)]
pub enum SyncError {
    /// Datos espaciales ausentes o mal formados en un registro
    #[error("Validation error: {0}")]
    Validation(String),

    /// Falla a nivel de transporte (DNS, conexión rechazada, TLS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// El servicio remoto no respondió dentro del plazo configurado
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Respuesta HTTP con estado fuera del rango 2xx
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// Cuerpo JSON o polyline imposible de decodificar
    #[error("Decode error: {0}")]
    Decode(String),

    /// Falla de persistencia en el almacén de registros
    #[error("Store error: {0}")]
    Store(String),

    /// Parámetros de construcción o configuración inválidos
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for SyncError {
    fn from(e: sqlx::Error) -> Self {
        SyncError::Store(e.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Decode(e.to_string())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type SyncResult<T> = Result<T, SyncError>;
