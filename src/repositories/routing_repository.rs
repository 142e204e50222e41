//! Repositorio de registros de routing
//!
//! Abstrae la persistencia de RoutingRequest: consulta por estado y
//! actualización parcial por id. La implementación concreta va contra
//! la tabla `here_routing` de PostgreSQL.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::routing_request::{Patch, RouteStatus, RoutingRequest, RoutingUpdate};
use crate::utils::errors::{SyncError, SyncResult};

/// Almacén de registros de routing
#[async_trait]
pub trait RoutingStore: Send + Sync {
    /// Todos los registros en el estado dado, sin límite de página
    async fn find_by_status(&self, status: RouteStatus) -> SyncResult<Vec<RoutingRequest>>;

    /// Actualización parcial por id; los campos en `Keep` no se tocan
    async fn update(&self, id: Uuid, update: RoutingUpdate) -> SyncResult<()>;
}

const SELECT_COLUMNS: &str = "id, status, method, transport_mode, routing_mode, \
    return_attributes, span_attributes, currency, origin, destination, \
    vehicle_weight_per_axle, vehicle_width, vehicle_length, vehicle_kpra_length, \
    vehicle_payload_capacity, vehicle_speed_cap, vehicle_gross_weight, \
    vehicle_current_weight, vehicle_tunnel_category, vehicle_axle_count, \
    vehicle_type, vehicle_category, vehicle_trailer_count, vehicle_license_plate, \
    vehicle_occupancy, vehicle_engine_type, vehicle_height_above_first_axle, \
    vehicle_commercial, shipped_hazardous_goods, request, response, routes, \
    error, date_created, date_updated";

/// Implementación PostgreSQL del almacén
pub struct PgRoutingRepository {
    pool: PgPool,
}

impl PgRoutingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoutingStore for PgRoutingRepository {
    async fn find_by_status(&self, status: RouteStatus) -> SyncResult<Vec<RoutingRequest>> {
        let query = format!(
            "SELECT {} FROM here_routing WHERE status = $1",
            SELECT_COLUMNS
        );

        let rotas = sqlx::query_as::<_, RoutingRequest>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SyncError::Store(format!("Error buscando rutas por estado: {}", e)))?;

        Ok(rotas)
    }

    async fn update(&self, id: Uuid, update: RoutingUpdate) -> SyncResult<()> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE here_routing SET date_updated = now()");

        if let Some(status) = update.status {
            builder.push(", status = ").push_bind(status);
        }
        push_patch(&mut builder, "request", update.request);
        push_patch(
            &mut builder,
            "response",
            map_json(update.response),
        );
        push_patch(&mut builder, "routes", map_json(update.routes));
        push_patch(&mut builder, "error", update.error);

        builder.push(" WHERE id = ").push_bind(id);

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| SyncError::Store(format!("Error actualizando la ruta {}: {}", id, e)))?;

        Ok(())
    }
}

fn map_json(patch: Patch<serde_json::Value>) -> Patch<sqlx::types::Json<serde_json::Value>> {
    match patch {
        Patch::Keep => Patch::Keep,
        Patch::Clear => Patch::Clear,
        Patch::Set(value) => Patch::Set(sqlx::types::Json(value)),
    }
}

fn push_patch<'a, T>(builder: &mut QueryBuilder<'a, Postgres>, column: &str, patch: Patch<T>)
where
    T: 'a + Send + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres>,
{
    match patch {
        Patch::Keep => {}
        Patch::Clear => {
            builder.push(format!(", {} = NULL", column));
        }
        Patch::Set(value) => {
            builder.push(format!(", {} = ", column)).push_bind(value);
        }
    }
}
