use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use here_routing_sync::clients::api_client::ApiClient;
use here_routing_sync::config::environment::EnvironmentConfig;
use here_routing_sync::database::connection::create_pool;
use here_routing_sync::repositories::routing_repository::PgRoutingRepository;
use here_routing_sync::services::routing_service::RoutingService;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🗺️ HERE Routing Sync");
    info!("====================");

    let config = match EnvironmentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Error de configuración: {}", e);
            return Err(e);
        }
    };

    // Inicializar base de datos
    let pool = match create_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let api_client = ApiClient::new(
        &config.here_api_base_url,
        &config.here_api_token,
        &config.here_api_routes_path,
        Some(config.request_timeout_ms),
    )
    .map_err(|e| anyhow::anyhow!("Error creando el cliente de HERE: {}", e))?;

    let store = Arc::new(PgRoutingRepository::new(pool));
    let service = RoutingService::new(store, Arc::new(api_client), config.integration_enabled);

    info!(
        "⏰ Sincronizando cada {} segundos (timeout de llamada: {} ms)",
        config.sync_interval_secs, config.request_timeout_ms
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(config.sync_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Las fallas de ciclo se loguean y se espera el próximo
                // disparo; el scheduler nunca se detiene por ellas
                if let Err(e) = service.sincronizar().await {
                    error!("❌ Falla al sincronizar con here.com. Error = {}.", e);
                }
            }
            _ = shutdown_signal() => {
                break;
            }
        }
    }

    info!("👋 Servicio terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando el servicio...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando el servicio...");
        },
    }
}
