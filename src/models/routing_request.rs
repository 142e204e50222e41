//! Modelo de RoutingRequest
//!
//! Este módulo contiene el struct RoutingRequest y el enum de estado del
//! ciclo de vida. Mapea exactamente a la tabla `here_routing` del schema
//! PostgreSQL con primary key `id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del registro de routing - mapea al ENUM route_status
///
/// Solo el orquestador de sincronización muta el estado: `Draft` pasa a
/// `Published` al sincronizar con éxito. Ante una falla el registro
/// permanece en `Draft` con el campo `error` escrito, por lo que vuelve
/// a ser elegible en el próximo ciclo.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "route_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    #[default]
    Draft,
    Published,
    Archived,
    Error,
}

impl RouteStatus {
    /// Un registro solo es elegible para sincronizar en estado `Draft`
    pub fn is_syncable(&self) -> bool {
        matches!(self, RouteStatus::Draft)
    }

    /// Transiciones válidas dentro de un ciclo de sincronización
    pub fn can_transition_to(&self, next: RouteStatus) -> bool {
        match self {
            RouteStatus::Draft => matches!(next, RouteStatus::Published | RouteStatus::Error),
            // Volver a Draft lo hace un editor externo, nunca el ciclo
            RouteStatus::Published | RouteStatus::Error | RouteStatus::Archived => {
                matches!(next, RouteStatus::Draft)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Draft => "draft",
            RouteStatus::Published => "published",
            RouteStatus::Archived => "archived",
            RouteStatus::Error => "error",
        }
    }
}

/// RoutingRequest principal - un registro por cálculo de ruta deseado
///
/// `origin` y `destination` se guardan como JSON crudo y se validan
/// estructuralmente recién al armar el payload: un Point mal formado
/// falla ese registro individual, nunca el batch completo.
#[derive(Debug, Clone, Default, FromRow)]
pub struct RoutingRequest {
    pub id: Uuid,
    pub status: RouteStatus,
    pub method: Option<String>,
    pub transport_mode: Option<String>,
    pub routing_mode: Option<String>,
    pub return_attributes: Option<Vec<String>>,
    pub span_attributes: Option<Vec<String>>,
    pub currency: Option<String>,
    pub origin: Option<Json<Value>>,
    pub destination: Option<Json<Value>>,

    // Perfil del vehículo: parámetros con default numérico del lado
    // del servicio (se emiten siempre, 0 cuando faltan)
    pub vehicle_weight_per_axle: Option<i64>,
    pub vehicle_width: Option<i64>,
    pub vehicle_length: Option<i64>,
    pub vehicle_kpra_length: Option<i64>,
    pub vehicle_payload_capacity: Option<i64>,
    pub vehicle_speed_cap: Option<f64>,
    pub vehicle_gross_weight: Option<i64>,

    // Perfil del vehículo: parámetros que solo se emiten cuando están
    // presentes, para no pisar los defaults del servicio remoto
    pub vehicle_current_weight: Option<i64>,
    pub vehicle_tunnel_category: Option<String>,
    pub vehicle_axle_count: Option<i32>,
    pub vehicle_type: Option<String>,
    pub vehicle_category: Option<String>,
    pub vehicle_trailer_count: Option<i32>,
    pub vehicle_license_plate: Option<String>,
    pub vehicle_occupancy: Option<i32>,
    pub vehicle_engine_type: Option<String>,
    pub vehicle_height_above_first_axle: Option<i64>,
    pub vehicle_commercial: Option<bool>,
    pub shipped_hazardous_goods: Option<Vec<String>>,

    // Resultado del último intento de sincronización
    pub request: Option<String>,
    pub response: Option<Json<Value>>,
    pub routes: Option<Json<Value>>,
    pub error: Option<String>,

    pub date_created: Option<DateTime<Utc>>,
    pub date_updated: Option<DateTime<Utc>>,
}

/// Operación sobre un campo en una actualización parcial
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    /// El campo no se toca
    #[default]
    Keep,
    /// El campo se pone en NULL
    Clear,
    /// El campo toma el valor dado
    Set(T),
}

/// Actualización parcial de un RoutingRequest
///
/// Cada intento de sincronización escribe los campos de resultado a
/// través de este struct; los campos en `Keep` no aparecen en el UPDATE.
#[derive(Debug, Clone, Default)]
pub struct RoutingUpdate {
    pub status: Option<RouteStatus>,
    pub request: Patch<String>,
    pub response: Patch<Value>,
    pub routes: Patch<Value>,
    pub error: Patch<String>,
}

impl RoutingUpdate {
    /// Rastro de auditoría: el payload saliente se persiste antes de la
    /// llamada remota, independiente del resultado
    pub fn request_sent(payload: String) -> Self {
        Self {
            request: Patch::Set(payload),
            ..Self::default()
        }
    }

    /// Sincronización exitosa: publica y limpia el último error
    pub fn published(response: Value, routes: Value) -> Self {
        Self {
            status: Some(RouteStatus::Published),
            response: Patch::Set(response),
            routes: Patch::Set(routes),
            error: Patch::Clear,
            ..Self::default()
        }
    }

    /// Falla del intento: guarda el mensaje y deja el estado en Draft
    /// para que el registro vuelva a ser elegible en el próximo ciclo
    pub fn failed(message: String) -> Self {
        Self {
            error: Patch::Set(message),
            ..Self::default()
        }
    }

    /// Regla de re-encolado: al editar un registro de vuelta a Draft se
    /// limpian los campos de resultado del intento anterior.
    ///
    /// El ciclo de sincronización nunca la invoca; existe para los
    /// editores externos y el tooling que re-encolan registros sobre
    /// el mismo almacén.
    pub fn cleared_draft() -> Self {
        Self {
            status: Some(RouteStatus::Draft),
            request: Patch::Clear,
            response: Patch::Clear,
            routes: Patch::Clear,
            error: Patch::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(RouteStatus::Published).unwrap(),
            serde_json::json!("published")
        );
        assert_eq!(RouteStatus::Draft.as_str(), "draft");
    }

    #[test]
    fn test_only_draft_is_syncable() {
        assert!(RouteStatus::Draft.is_syncable());
        assert!(!RouteStatus::Published.is_syncable());
        assert!(!RouteStatus::Archived.is_syncable());
        assert!(!RouteStatus::Error.is_syncable());
    }

    #[test]
    fn test_cycle_transitions() {
        assert!(RouteStatus::Draft.can_transition_to(RouteStatus::Published));
        assert!(RouteStatus::Draft.can_transition_to(RouteStatus::Error));
        assert!(!RouteStatus::Draft.can_transition_to(RouteStatus::Archived));
        assert!(RouteStatus::Published.can_transition_to(RouteStatus::Draft));
        assert!(!RouteStatus::Published.can_transition_to(RouteStatus::Error));
    }

    #[test]
    fn test_published_update_clears_error() {
        let update = RoutingUpdate::published(Value::Null, Value::Null);
        assert_eq!(update.status, Some(RouteStatus::Published));
        assert_eq!(update.error, Patch::Clear);
    }

    #[test]
    fn test_failed_update_keeps_status() {
        let update = RoutingUpdate::failed("boom".to_string());
        assert_eq!(update.status, None);
        assert_eq!(update.error, Patch::Set("boom".to_string()));
        assert_eq!(update.response, Patch::Keep);
    }

    #[test]
    fn test_cleared_draft_wipes_outcome_fields() {
        let update = RoutingUpdate::cleared_draft();
        assert_eq!(update.status, Some(RouteStatus::Draft));
        assert_eq!(update.request, Patch::Clear);
        assert_eq!(update.response, Patch::Clear);
        assert_eq!(update.routes, Patch::Clear);
        assert_eq!(update.error, Patch::Clear);
    }
}
