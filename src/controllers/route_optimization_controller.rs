//! Controlador de optimización de rutas
//!
//! Este módulo maneja los endpoints de optimización y consulta de rutas.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::route_optimization_dto::OptimizeRequest;
use crate::models::RouteDetails;
use crate::state::AppState;
use crate::utils::errors::{invalid_request, AppError};

/// Optimizar y crear una ruta
pub async fn optimize_route(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<RouteDetails>, AppError> {
    let Json(request) = payload.map_err(|e| invalid_request(e.body_text()))?;
    request.validate()?;

    log::info!(
        "🎯 Recibida solicitud de optimización para conductor {} con {} pedidos",
        request.driver_id,
        request.order_ids.len()
    );

    let route = state
        .optimizer
        .optimize(&request.driver_id, &request.order_ids)
        .await?;

    Ok(Json(route))
}

/// Listar rutas (más recientes primero)
pub async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<RouteDetails>>, AppError> {
    let routes = state.optimizer.list_routes().await?;
    Ok(Json(routes))
}

/// Obtener una ruta con conductor y paradas
pub async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RouteDetails>, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| invalid_request(format!("invalid route id '{}'", id)))?;
    let route = state.optimizer.get_route(id).await?;
    Ok(Json(route))
}

/// Health check del servicio
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "route_optimization",
        "solver_enabled": state.optimizer.solver_enabled(),
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
