//! Modelo del resultado de routing reformateado
//!
//! Este módulo contiene la forma "aplanada" que persiste el servicio:
//! la respuesta anidada de HERE (routes → sections → places/spans) se
//! reescribe en estos structs para que los consumidores no tengan que
//! conocer el formato del proveedor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::geo::{LineString, Point};

/// Resultado completo de una sincronización: lista de rutas calculadas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteResult {
    pub routes: Vec<Route>,
}

/// Una ruta calculada por el servicio remoto
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Tramo de una ruta con su geometría decodificada
///
/// `places` y `spans` siempre están presentes (vacíos si el proveedor
/// no los devolvió) para que los consumidores iteren sin chequear null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub section_type: String,
    pub language: String,
    pub polyline: LineString,
    pub transport: Transport,
    pub places: Vec<Place>,
    pub spans: Vec<Span>,
}

/// Descriptor del medio de transporte del tramo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transport {
    pub mode: String,
    pub current_weight: i64,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            mode: "car".to_string(),
            current_weight: 3000,
        }
    }
}

/// Lugar de salida o llegada de un tramo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    /// "departure" o "arrival"
    pub name: String,
    #[serde(rename = "type")]
    pub place_type: String,
    /// Ubicación ajustada a la red vial
    pub location: Point,
    /// Ubicación original, previa al ajuste
    pub original_location: Point,
    pub time: String,
    /// Payload crudo del lugar tal como lo devolvió el proveedor
    pub raw: Value,
}

/// Segmento de la geometría con atributos propios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub offset: i64,
    pub duration: i64,
    pub max_speed: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_result_has_no_routes() {
        let result = RouteResult::default();
        assert!(result.routes.is_empty());
    }

    #[test]
    fn test_default_transport_matches_remote_defaults() {
        let transport = Transport::default();
        assert_eq!(transport.mode, "car");
        assert_eq!(transport.current_weight, 3000);
    }

    #[test]
    fn test_span_serializes_null_max_speed() {
        let span = Span {
            offset: 0,
            duration: 120,
            max_speed: None,
        };
        let value = serde_json::to_value(&span).unwrap();
        assert!(value["max_speed"].is_null());
    }
}
