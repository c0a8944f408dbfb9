//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del servicio de optimización
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::repositories::route_store::StoreError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Driver with id '{0}' not found")]
    DriverNotFound(Uuid),

    #[error("Orders not found")]
    OrdersNotFound,

    #[error("Route with id '{0}' not found")]
    RouteNotFound(Uuid),

    #[error("Optimization failed: {0}")]
    OptimizationFailed(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<&str> = errors.field_errors().keys().copied().collect();
        AppError::InvalidRequest(format!("invalid fields: {}", fields.join(", ")))
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl AppError {
    /// Código estable que identifica el tipo de error
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::DriverNotFound(_) => "DRIVER_NOT_FOUND",
            AppError::OrdersNotFound => "ORDERS_NOT_FOUND",
            AppError::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            AppError::OptimizationFailed(_) => "OPTIMIZATION_FAILED",
            AppError::Store(_) => "STORE_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DriverNotFound(_) | AppError::OrdersNotFound | AppError::RouteNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::OptimizationFailed(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code().to_string();

        let error_response = match self {
            AppError::InvalidRequest(msg) => {
                log::warn!("⚠️ Solicitud inválida: {}", msg);
                ErrorResponse {
                    error: "Invalid Request".to_string(),
                    message: msg,
                    details: None,
                    code,
                }
            }

            AppError::DriverNotFound(id) => {
                log::warn!("❌ Conductor no encontrado: {}", id);
                ErrorResponse {
                    error: "Not Found".to_string(),
                    message: "Driver not found".to_string(),
                    details: Some(json!({ "driver_id": id })),
                    code,
                }
            }

            AppError::OrdersNotFound => {
                log::warn!("❌ Ningún pedido encontrado");
                ErrorResponse {
                    error: "Not Found".to_string(),
                    message: "Orders not found".to_string(),
                    details: None,
                    code,
                }
            }

            AppError::RouteNotFound(id) => {
                log::warn!("❌ Ruta no encontrada: {}", id);
                ErrorResponse {
                    error: "Not Found".to_string(),
                    message: "Route not found".to_string(),
                    details: Some(json!({ "route_id": id })),
                    code,
                }
            }

            AppError::OptimizationFailed(msg) => {
                log::error!("❌ Error optimizando ruta: {}", msg);
                ErrorResponse {
                    error: "Optimization Failed".to_string(),
                    message: "Failed to optimize route".to_string(),
                    details: Some(json!({ "reason": msg })),
                    code,
                }
            }

            AppError::Store(e) => {
                log::error!("❌ Error del almacén de datos: {}", e);
                ErrorResponse {
                    error: "Store Error".to_string(),
                    message: "An error occurred while accessing the record store".to_string(),
                    details: None,
                    code,
                }
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de solicitud inválida
pub fn invalid_request(message: impl Into<String>) -> AppError {
    AppError::InvalidRequest(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_by_kind() {
        assert_eq!(invalid_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::DriverNotFound(Uuid::nil()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::OrdersNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::OptimizationFailed("db".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Store(StoreError::Backend("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            invalid_request("x"),
            AppError::DriverNotFound(Uuid::nil()),
            AppError::OrdersNotFound,
            AppError::RouteNotFound(Uuid::nil()),
            AppError::OptimizationFailed("x".into()),
            AppError::Store(StoreError::Backend("x".into())),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
