//! Modelo de Driver
//!
//! Mapea la tabla `drivers`. El motor sólo lee la última posición conocida.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::utils::geo::Coordinate;

/// Estado del conductor - mapea al ENUM driver_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "driver_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Available,
    OnRoute,
    Offline,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub vehicle_type: String,
    pub status: DriverStatus,
    pub current_location_lat: Option<f64>,
    pub current_location_lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Driver {
    /// Última posición conocida, sólo si ambas coordenadas están presentes
    pub fn current_location(&self) -> Option<Coordinate> {
        match (self.current_location_lat, self.current_location_lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }
}
