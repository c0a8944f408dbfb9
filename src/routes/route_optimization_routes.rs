//! Rutas de optimización
//!
//! Este módulo define las rutas HTTP del motor de secuenciación.

use axum::{
    routing::{get, post},
    Router,
};

use crate::controllers::route_optimization_controller;
use crate::state::AppState;

/// Crear el router para optimización y consulta de rutas
pub fn create_route_optimization_router() -> Router<AppState> {
    Router::new()
        .route("/optimize", post(route_optimization_controller::optimize_route))
        .route("/routes", get(route_optimization_controller::list_routes))
        .route("/routes/:id", get(route_optimization_controller::get_route))
}
