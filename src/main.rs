use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use dotenvy::dotenv;

use fleet_route_optimizer::config::database::DatabaseConfig;
use fleet_route_optimizer::config::environment::EnvironmentConfig;
use fleet_route_optimizer::database::DatabaseConnection;
use fleet_route_optimizer::repositories::{InMemoryRouteStore, RouteRepository, RouteStore};
use fleet_route_optimizer::routes::create_app_router;
use fleet_route_optimizer::services::RouteOptimizationService;
use fleet_route_optimizer::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚚 Fleet Route Optimizer - Motor de secuenciación");
    info!("================================================");

    // Inicializar almacén de rutas
    let store: Arc<dyn RouteStore> = match DatabaseConfig::from_env() {
        Some(db_config) => match DatabaseConnection::new(&db_config).await {
            Ok(conn) => Arc::new(RouteRepository::new(conn.pool().clone())),
            Err(e) => {
                error!("❌ Error conectando a la base de datos: {}", e);
                return Err(anyhow::anyhow!("Error de base de datos: {}", e));
            }
        },
        None => {
            warn!("⚠️ DATABASE_URL no definida, usando almacén en memoria");
            Arc::new(InMemoryRouteStore::new())
        }
    };

    let optimizer = RouteOptimizationService::from_config(store, &config)?;

    let addr = config.server_url();
    let app = create_app_router(AppState::new(config, optimizer));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🗺️ Endpoints de rutas:");
    info!("   POST /api/optimize - Optimizar y crear ruta");
    info!("   GET  /api/routes - Listar rutas");
    info!("   GET  /api/routes/:id - Obtener ruta con paradas");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
