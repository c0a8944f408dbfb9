//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::route_optimization_service::RouteOptimizationService;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub optimizer: Arc<RouteOptimizationService>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, optimizer: RouteOptimizationService) -> Self {
        Self {
            config,
            optimizer: Arc::new(optimizer),
        }
    }
}
