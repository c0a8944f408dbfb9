use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::route_store::{assemble_route_details, RouteStore, StoreError};
use crate::models::{Driver, MaterializedRoute, Order, Route, RouteDetails, Stop};

const DRIVER_COLUMNS: &str = "id, name, phone, email, vehicle_type, status, \
    current_location_lat, current_location_lng, created_at";

const ORDER_COLUMNS: &str = "id, customer_name, delivery_address, customer_phone, priority, status, \
    latitude, longitude, service_time_minutes, route_id, assigned_driver_id, stop_number, created_at";

const ROUTE_COLUMNS: &str = "id, driver_id, status, total_distance_km, total_time_minutes, created_at";

const STOP_COLUMNS: &str = "id, route_id, order_id, stop_index, eta, \
    distance_from_prev_km, travel_time_from_prev_minutes";

/// Almacén PostgreSQL de conductores, pedidos, rutas y paradas
pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Carga conductores, paradas y pedidos de `routes` con una consulta por
    /// tabla, sea cual sea el número de rutas
    async fn load_details(&self, routes: Vec<Route>) -> Result<Vec<RouteDetails>, StoreError> {
        if routes.is_empty() {
            return Ok(Vec::new());
        }

        let route_ids: Vec<Uuid> = routes.iter().map(|r| r.id).collect();
        let mut driver_ids: Vec<Uuid> = routes.iter().map(|r| r.driver_id).collect();
        driver_ids.sort();
        driver_ids.dedup();

        let drivers: HashMap<Uuid, Driver> =
            sqlx::query_as::<_, Driver>(&format!("SELECT {} FROM drivers WHERE id = ANY($1)", DRIVER_COLUMNS))
                .bind(&driver_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|d| (d.id, d))
                .collect();

        let stops = sqlx::query_as::<_, Stop>(&format!(
            "SELECT {} FROM stops WHERE route_id = ANY($1) ORDER BY route_id, stop_index",
            STOP_COLUMNS
        ))
        .bind(&route_ids)
        .fetch_all(&self.pool)
        .await?;

        let order_ids: Vec<Uuid> = stops.iter().map(|s| s.order_id).collect();
        let orders: HashMap<Uuid, Order> = self
            .find_orders(&order_ids)
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();

        assemble_route_details(routes, &drivers, stops, &orders)
    }
}

#[async_trait]
impl RouteStore for RouteRepository {
    async fn find_driver(&self, id: Uuid) -> Result<Option<Driver>, StoreError> {
        let driver = sqlx::query_as::<_, Driver>(&format!("SELECT {} FROM drivers WHERE id = $1", DRIVER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    async fn find_orders(&self, ids: &[Uuid]) -> Result<Vec<Order>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let orders = sqlx::query_as::<_, Order>(&format!("SELECT {} FROM orders WHERE id = ANY($1)", ORDER_COLUMNS))
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    async fn save_route_plan(&self, route: &Route, plan: &MaterializedRoute) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO routes (id, driver_id, status, total_distance_km, total_time_minutes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(route.id)
        .bind(route.driver_id)
        .bind(route.status)
        .bind(route.total_distance_km)
        .bind(route.total_time_minutes)
        .bind(route.created_at)
        .execute(&mut *tx)
        .await?;

        for stop in &plan.stops {
            sqlx::query(
                r#"
                INSERT INTO stops
                    (id, route_id, order_id, stop_index, eta, distance_from_prev_km, travel_time_from_prev_minutes)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(stop.id)
            .bind(stop.route_id)
            .bind(stop.order_id)
            .bind(stop.stop_index)
            .bind(stop.eta)
            .bind(stop.distance_from_prev_km)
            .bind(stop.travel_time_from_prev_minutes)
            .execute(&mut *tx)
            .await?;
        }

        for assignment in &plan.assignments {
            let result = sqlx::query(
                r#"
                UPDATE orders
                SET route_id = $2, assigned_driver_id = $3, stop_number = $4, status = $5
                WHERE id = $1
                "#,
            )
            .bind(assignment.order_id)
            .bind(assignment.route_id)
            .bind(assignment.driver_id)
            .bind(assignment.stop_number)
            .bind(assignment.status)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(StoreError::Inconsistent(format!(
                    "order {} disappeared during assignment",
                    assignment.order_id
                )));
            }
        }

        sqlx::query("UPDATE routes SET total_distance_km = $2, total_time_minutes = $3 WHERE id = $1")
            .bind(route.id)
            .bind(plan.totals.total_distance_km)
            .bind(plan.totals.total_time_minutes)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::info!("💾 Ruta {} guardada con {} paradas", route.id, plan.stops.len());
        Ok(())
    }

    async fn find_route(&self, id: Uuid) -> Result<Option<RouteDetails>, StoreError> {
        let route = sqlx::query_as::<_, Route>(&format!("SELECT {} FROM routes WHERE id = $1", ROUTE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match route {
            Some(route) => Ok(self.load_details(vec![route]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_routes(&self) -> Result<Vec<RouteDetails>, StoreError> {
        let routes = sqlx::query_as::<_, Route>(&format!(
            "SELECT {} FROM routes ORDER BY created_at DESC",
            ROUTE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        self.load_details(routes).await
    }
}
