//! Modelo de Route y Stop
//!
//! Una ruta se crea en estado `planned` con totales a cero; las paradas se
//! añaden y los totales se actualizan en la misma operación. La ruta es
//! dueña exclusiva de sus paradas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use super::driver::Driver;
use super::order::Order;

/// Estado de la ruta - mapea al ENUM route_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "route_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Planned,
    Active,
    Completed,
}

/// Route principal - mapea la tabla routes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub status: RouteStatus,
    pub total_distance_km: f64,
    pub total_time_minutes: i32,
    pub created_at: DateTime<Utc>,
}

/// Parada persistida - mapea la tabla stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Stop {
    pub id: Uuid,
    pub route_id: Uuid,
    pub order_id: Uuid,
    pub stop_index: i32,
    pub eta: DateTime<Utc>,
    pub distance_from_prev_km: f64,
    pub travel_time_from_prev_minutes: i32,
}

/// Totales de la ruta (suma de todos los tramos)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RouteTotals {
    pub total_distance_km: f64,
    pub total_time_minutes: i32,
}

/// Resultado del materializador: paradas, asignaciones y totales de una ruta
#[derive(Debug, Clone, Default)]
pub struct MaterializedRoute {
    pub stops: Vec<Stop>,
    pub assignments: Vec<super::order::OrderAssignment>,
    pub totals: RouteTotals,
}

/// Parada con su pedido
#[derive(Debug, Clone, Serialize)]
pub struct StopDetails {
    #[serde(flatten)]
    pub stop: Stop,
    pub order: Order,
}

/// Ruta completa: conductor y paradas ordenadas por posición
#[derive(Debug, Clone, Serialize)]
pub struct RouteDetails {
    #[serde(flatten)]
    pub route: Route,
    pub driver: Driver,
    pub stops: Vec<StopDetails>,
}
