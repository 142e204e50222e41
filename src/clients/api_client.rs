//! Cliente HTTP para la API de routing de HERE
//!
//! Este módulo contiene el cliente HTTP genérico hacia el endpoint de
//! rutas: una sola llamada saliente GET o POST, acotada por timeout,
//! con la API key siempre como query parameter.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::utils::errors::{SyncError, SyncResult};

/// Timeout por defecto para las llamadas salientes
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Método HTTP soportado por el servicio remoto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Interpreta el campo `method` de un registro; ausente equivale a GET
    pub fn parse(raw: Option<&str>) -> SyncResult<Self> {
        match raw.map(|m| m.trim().to_uppercase()) {
            None => Ok(HttpMethod::Get),
            Some(m) if m.is_empty() || m == "GET" => Ok(HttpMethod::Get),
            Some(m) if m == "POST" => Ok(HttpMethod::Post),
            Some(other) => Err(SyncError::Validation(format!(
                "Método HTTP no soportado: {}",
                other
            ))),
        }
    }
}

/// Abstracción de la llamada remota, para poder simular el servicio
/// de HERE en los tests del orquestador
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn call(&self, method: HttpMethod, params: &Map<String, Value>) -> SyncResult<Value>;
}

/// Cliente HTTP hacia la API de HERE
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    path: String,
    api_key: String,
    timeout: Duration,
}

impl ApiClient {
    /// Construye el cliente; falla si baseUrl, apiKey o path están vacíos
    pub fn new(
        base_url: &str,
        api_key: &str,
        path: &str,
        timeout_ms: Option<u64>,
    ) -> SyncResult<Self> {
        if base_url.trim().is_empty() || api_key.trim().is_empty() || path.trim().is_empty() {
            return Err(SyncError::Config(
                "Parámetros obligatorios (baseUrl, apiKey, path) no fueron proporcionados"
                    .to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SyncError::Config(format!("Error creando el cliente HTTP: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            path: path.to_string(),
            api_key: api_key.to_string(),
            timeout: Duration::from_millis(timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }

    /// Convierte el error de reqwest al taxon correspondiente
    fn map_transport_error(&self, e: reqwest::Error) -> SyncError {
        if e.is_timeout() {
            SyncError::Timeout {
                ms: self.timeout.as_millis() as u64,
            }
        } else if e.is_decode() {
            SyncError::Decode(e.to_string())
        } else {
            SyncError::Transport(e.to_string())
        }
    }

    async fn request(&self, method: HttpMethod, params: &Map<String, Value>) -> SyncResult<Value> {
        let url = self.endpoint();

        let request = match method {
            // Para GET los parámetros no nulos van como query string
            HttpMethod::Get => self.client.get(&url).query(&query_pairs(params)),
            // Para POST los parámetros van como cuerpo JSON
            HttpMethod::Post => self.client.post(&url).json(params),
        };

        // La API key siempre viaja como query parameter, sin importar
        // el método
        let response = request
            .query(&[("apikey", self.api_key.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| self.map_transport_error(e))
    }

    pub async fn get(&self, params: &Map<String, Value>) -> SyncResult<Value> {
        self.request(HttpMethod::Get, params).await
    }

    pub async fn post(&self, params: &Map<String, Value>) -> SyncResult<Value> {
        self.request(HttpMethod::Post, params).await
    }
}

#[async_trait]
impl RemoteApi for ApiClient {
    async fn call(&self, method: HttpMethod, params: &Map<String, Value>) -> SyncResult<Value> {
        self.request(method, params).await
    }
}

/// Serializa los parámetros para la query string de un GET. Los valores
/// nulos se omiten por completo, no se mandan como string vacío.
fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_rejects_empty_required_params() {
        assert!(matches!(
            ApiClient::new("", "key", "/routes", None),
            Err(SyncError::Config(_))
        ));
        assert!(matches!(
            ApiClient::new("https://example.com", " ", "/routes", None),
            Err(SyncError::Config(_))
        ));
        assert!(matches!(
            ApiClient::new("https://example.com", "key", "", None),
            Err(SyncError::Config(_))
        ));
        assert!(ApiClient::new("https://example.com", "key", "/routes", None).is_ok());
    }

    #[test]
    fn test_parse_method_defaults_to_get() {
        assert_eq!(HttpMethod::parse(None).unwrap(), HttpMethod::Get);
        assert_eq!(HttpMethod::parse(Some("")).unwrap(), HttpMethod::Get);
        assert_eq!(HttpMethod::parse(Some("get")).unwrap(), HttpMethod::Get);
        assert_eq!(HttpMethod::parse(Some("post")).unwrap(), HttpMethod::Post);
    }

    #[test]
    fn test_parse_method_rejects_unsupported() {
        assert!(matches!(
            HttpMethod::parse(Some("DELETE")),
            Err(SyncError::Validation(_))
        ));
    }

    #[test]
    fn test_query_pairs_omits_null_values() {
        let mut params = Map::new();
        params.insert("origin".to_string(), json!("52.53,13.38"));
        params.insert("currency".to_string(), Value::Null);
        params.insert("vehicle[grossWeight]".to_string(), json!(0));

        let pairs = query_pairs(&params);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&("origin".to_string(), "52.53,13.38".to_string())));
        assert!(pairs.contains(&("vehicle[grossWeight]".to_string(), "0".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "currency"));
    }

    #[test]
    fn test_query_pairs_renders_strings_without_quotes() {
        let mut params = Map::new();
        params.insert("return".to_string(), json!("summary,polyline"));

        let pairs = query_pairs(&params);
        assert_eq!(pairs[0].1, "summary,polyline");
    }
}
