//! Abstracción del almacén de registros
//!
//! El motor lee conductores y pedidos y escribe rutas, paradas y asignaciones
//! a través de este trait. La implementación PostgreSQL vive en
//! `route_repository`, la implementación en memoria en `memory_route_store`.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Driver, MaterializedRoute, Order, Route, RouteDetails, Stop, StopDetails};

/// Errores del almacén de registros
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Datos referenciados que no existen (p.ej. una parada sin pedido)
    #[error("Inconsistent data: {0}")]
    Inconsistent(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait RouteStore: Send + Sync {
    async fn find_driver(&self, id: Uuid) -> Result<Option<Driver>, StoreError>;

    /// Pedidos cuyos ids están en `ids`. Los ids inexistentes se omiten y el
    /// orden del resultado no está garantizado.
    async fn find_orders(&self, ids: &[Uuid]) -> Result<Vec<Order>, StoreError>;

    /// Persiste una ruta nueva de forma atómica: crea la ruta `planned` con
    /// totales a cero, inserta paradas, asigna pedidos y actualiza totales.
    async fn save_route_plan(&self, route: &Route, plan: &MaterializedRoute) -> Result<(), StoreError>;

    async fn find_route(&self, id: Uuid) -> Result<Option<RouteDetails>, StoreError>;

    /// Todas las rutas, de la más reciente a la más antigua
    async fn list_routes(&self) -> Result<Vec<RouteDetails>, StoreError>;
}

/// Arma `RouteDetails` a partir de filas ya cargadas. Las paradas se agrupan
/// por ruta y se ordenan por `stop_index`; el orden de `routes` se conserva.
pub fn assemble_route_details(
    routes: Vec<Route>,
    drivers: &HashMap<Uuid, Driver>,
    stops: Vec<Stop>,
    orders: &HashMap<Uuid, Order>,
) -> Result<Vec<RouteDetails>, StoreError> {
    let mut stops_by_route: HashMap<Uuid, Vec<Stop>> = HashMap::new();
    for stop in stops {
        stops_by_route.entry(stop.route_id).or_default().push(stop);
    }

    routes
        .into_iter()
        .map(|route| -> Result<RouteDetails, StoreError> {
            let driver = drivers.get(&route.driver_id).cloned().ok_or_else(|| {
                StoreError::Inconsistent(format!("route {} references missing driver {}", route.id, route.driver_id))
            })?;

            let mut route_stops = stops_by_route.remove(&route.id).unwrap_or_default();
            route_stops.sort_by_key(|s| s.stop_index);

            let stops = route_stops
                .into_iter()
                .map(|stop| -> Result<StopDetails, StoreError> {
                    let order = orders.get(&stop.order_id).cloned().ok_or_else(|| {
                        StoreError::Inconsistent(format!("stop {} references missing order {}", stop.id, stop.order_id))
                    })?;
                    Ok(StopDetails { stop, order })
                })
                .collect::<Result<Vec<_>, StoreError>>()?;

            Ok(RouteDetails { route, driver, stops })
        })
        .collect()
}
