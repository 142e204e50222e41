//! Servicio de sincronización de rutas
//!
//! Este módulo contiene el loop de reconciliación contra la API de
//! routing de HERE: busca los registros en borrador, arma el payload,
//! llama al servicio remoto, reformatea la respuesta y persiste el
//! resultado o la falla de cada registro.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::clients::api_client::{HttpMethod, RemoteApi};
use crate::models::routing_request::{RouteStatus, RoutingRequest, RoutingUpdate};
use crate::repositories::routing_repository::RoutingStore;
use crate::services::{payload_builder, response_transformer};
use crate::utils::errors::{SyncError, SyncResult};

pub struct RoutingService {
    store: Arc<dyn RoutingStore>,
    api: Arc<dyn RemoteApi>,
    enabled: bool,
    // Guarda de vuelo único: si un ciclo sigue corriendo cuando llega
    // el próximo disparo del scheduler, el nuevo ciclo se omite
    in_flight: AtomicBool,
}

impl RoutingService {
    pub fn new(store: Arc<dyn RoutingStore>, api: Arc<dyn RemoteApi>, enabled: bool) -> Self {
        if !enabled {
            log::info!("Integración con la API de HERE desactivada");
        }
        Self {
            store,
            api,
            enabled,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Un ciclo de sincronización completo.
    ///
    /// Las fallas por registro se registran en el propio registro y no
    /// abortan el batch; una falla al consultar el batch inicial corta
    /// el ciclo y se propaga al scheduler.
    pub async fn sincronizar(&self) -> SyncResult<()> {
        if !self.enabled {
            log::info!("Integración desactivada, se omite el ciclo de sincronización");
            return Ok(());
        }

        if self.in_flight.swap(true, Ordering::SeqCst) {
            log::warn!("⏳ Ciclo anterior todavía en curso, se omite este disparo");
            return Ok(());
        }

        let result = self.run_cycle().await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn run_cycle(&self) -> SyncResult<()> {
        let rotas = self.store.find_by_status(RouteStatus::Draft).await?;
        log::info!("🔄 Sincronizando {} rutas en borrador", rotas.len());

        for rota in &rotas {
            if let Err(error) = self.sync_record(rota).await {
                log::error!("❌ Error al consultar rutas {}: {}", rota.id, error);
                self.record_failure(rota, error).await;
            }
        }

        Ok(())
    }

    /// Pipeline por registro: validar y armar payload → persistir el
    /// payload saliente → llamar al remoto → reformatear → publicar
    async fn sync_record(&self, rota: &RoutingRequest) -> SyncResult<()> {
        let payload = payload_builder::build(rota)?;

        // Rastro de auditoría, independiente de cómo termine el intento
        let serialized = serde_json::to_string(&payload)?;
        self.store
            .update(rota.id, RoutingUpdate::request_sent(serialized))
            .await?;

        let method = HttpMethod::parse(rota.method.as_deref())?;
        let raw = self.api.call(method, &payload).await?;

        let transformed = response_transformer::transform(&raw)?;
        let routes = serde_json::to_value(&transformed)?;

        self.store
            .update(rota.id, RoutingUpdate::published(raw, routes))
            .await?;

        log::info!("✅ Ruta {} sincronizada y publicada", rota.id);
        Ok(())
    }

    /// Escribe la falla en el registro; el estado queda en Draft así el
    /// registro vuelve a ser elegible en el próximo ciclo. Si además
    /// falla esta escritura, solo se loguea: nunca aborta el batch.
    async fn record_failure(&self, rota: &RoutingRequest, error: SyncError) {
        let update = RoutingUpdate::failed(error.to_string());
        if let Err(store_error) = self.store.update(rota.id, update).await {
            log::error!(
                "❌ Error al grabar el error de la ruta {}: {}",
                rota.id,
                store_error
            );
        }
    }
}
