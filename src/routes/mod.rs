pub mod route_optimization_routes;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::controllers::route_optimization_controller;
use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);

    Router::new()
        .route("/health", get(route_optimization_controller::health_check))
        .nest("/api", route_optimization_routes::create_route_optimization_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
