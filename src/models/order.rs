//! Modelo de Order
//!
//! Mapea la tabla `orders`. Los pedidos existen independientemente de la ruta:
//! la ruta sólo los referencia y, al optimizar, se les asigna ruta, conductor
//! y número de parada.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::utils::geo::Coordinate;

/// Estado del pedido - mapea al ENUM order_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Assigned,
    InProgress,
    Delivered,
    Failed,
}

/// Prioridad del pedido - mapea al ENUM order_priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "order_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub delivery_address: String,
    pub customer_phone: Option<String>,
    pub priority: OrderPriority,
    pub status: OrderStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub service_time_minutes: Option<i32>,
    pub route_id: Option<Uuid>,
    pub assigned_driver_id: Option<Uuid>,
    pub stop_number: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }
}

/// Asignación de un pedido a una ruta, producida por el materializador
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderAssignment {
    pub order_id: Uuid,
    pub route_id: Uuid,
    pub driver_id: Uuid,
    pub stop_number: i32,
    pub status: OrderStatus,
}
