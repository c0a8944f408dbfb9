//! Almacén en memoria
//!
//! Implementación de `RouteStore` sin base de datos, usada en tests y para
//! ejecutar el servicio localmente. `save_route_plan` valida todo antes de
//! escribir, así que una ruta nunca queda a medias.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::route_store::{assemble_route_details, RouteStore, StoreError};
use crate::models::{Driver, MaterializedRoute, Order, Route, RouteDetails, Stop};

#[derive(Default)]
struct Tables {
    drivers: HashMap<Uuid, Driver>,
    orders: HashMap<Uuid, Order>,
    routes: HashMap<Uuid, Route>,
    stops: Vec<Stop>,
}

#[derive(Default)]
pub struct InMemoryRouteStore {
    tables: RwLock<Tables>,
    fail_writes: AtomicBool,
}

impl InMemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_driver(&self, driver: Driver) {
        self.tables.write().await.drivers.insert(driver.id, driver);
    }

    pub async fn insert_order(&self, order: Order) {
        self.tables.write().await.orders.insert(order.id, order);
    }

    pub async fn get_order(&self, id: Uuid) -> Option<Order> {
        self.tables.read().await.orders.get(&id).cloned()
    }

    pub async fn route_count(&self) -> usize {
        self.tables.read().await.routes.len()
    }

    /// Hace fallar todas las escrituras siguientes (simula una caída del almacén)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn hydrate(tables: &Tables, routes: Vec<Route>) -> Result<Vec<RouteDetails>, StoreError> {
        let route_ids: HashSet<Uuid> = routes.iter().map(|r| r.id).collect();
        let stops: Vec<Stop> = tables
            .stops
            .iter()
            .filter(|s| route_ids.contains(&s.route_id))
            .cloned()
            .collect();

        assemble_route_details(routes, &tables.drivers, stops, &tables.orders)
    }
}

#[async_trait]
impl RouteStore for InMemoryRouteStore {
    async fn find_driver(&self, id: Uuid) -> Result<Option<Driver>, StoreError> {
        Ok(self.tables.read().await.drivers.get(&id).cloned())
    }

    async fn find_orders(&self, ids: &[Uuid]) -> Result<Vec<Order>, StoreError> {
        let tables = self.tables.read().await;
        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| tables.orders.get(id).cloned())
            .collect())
    }

    async fn save_route_plan(&self, route: &Route, plan: &MaterializedRoute) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("writes are disabled".to_string()));
        }

        let mut tables = self.tables.write().await;

        if let Some(missing) = plan.assignments.iter().find(|a| !tables.orders.contains_key(&a.order_id)) {
            return Err(StoreError::Inconsistent(format!(
                "order {} disappeared during assignment",
                missing.order_id
            )));
        }

        tables.routes.insert(route.id, route.clone());
        tables.stops.extend(plan.stops.iter().cloned());

        for assignment in &plan.assignments {
            if let Some(order) = tables.orders.get_mut(&assignment.order_id) {
                order.route_id = Some(assignment.route_id);
                order.assigned_driver_id = Some(assignment.driver_id);
                order.stop_number = Some(assignment.stop_number);
                order.status = assignment.status;
            }
        }

        if let Some(stored) = tables.routes.get_mut(&route.id) {
            stored.total_distance_km = plan.totals.total_distance_km;
            stored.total_time_minutes = plan.totals.total_time_minutes;
        }

        Ok(())
    }

    async fn find_route(&self, id: Uuid) -> Result<Option<RouteDetails>, StoreError> {
        let tables = self.tables.read().await;
        match tables.routes.get(&id) {
            Some(route) => Ok(Self::hydrate(&tables, vec![route.clone()])?.pop()),
            None => Ok(None),
        }
    }

    async fn list_routes(&self) -> Result<Vec<RouteDetails>, StoreError> {
        let tables = self.tables.read().await;
        let mut routes: Vec<Route> = tables.routes.values().cloned().collect();
        routes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Self::hydrate(&tables, routes)
    }
}
