//! DTOs para la API VRP del solver externo (formato GraphHopper)
//!
//! Este módulo define las estructuras de datos que se envían y reciben del
//! servicio de optimización de rutas.

use serde::{Deserialize, Serialize};

/// Request enviado al solver
#[derive(Debug, Serialize)]
pub struct VrpRequest {
    pub vehicles: Vec<VrpVehicle>,
    pub services: Vec<VrpService>,
    pub objectives: Vec<VrpObjective>,
}

/// Dirección con coordenadas
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct VrpAddress {
    pub location_id: String,
    pub lat: f64,
    pub lon: f64,
}

/// Vehículo de la flota (siempre uno)
#[derive(Debug, Serialize)]
pub struct VrpVehicle {
    pub vehicle_id: String,
    pub start_address: VrpAddress,
}

/// Servicio a realizar: una entrega por pedido
#[derive(Debug, Serialize)]
pub struct VrpService {
    pub id: String,
    pub name: String,
    pub address: VrpAddress,
    pub size: Vec<i32>,
    pub duration: u32, // duración en segundos
}

/// Objetivo de optimización
#[derive(Debug, Serialize)]
pub struct VrpObjective {
    #[serde(rename = "type")]
    pub objective_type: String,
    pub value: String,
}

impl VrpObjective {
    pub fn min_completion_time() -> Self {
        Self {
            objective_type: "min".to_string(),
            value: "completion_time".to_string(),
        }
    }
}

/// Respuesta del solver. Todo es opcional: la validación estructural se hace
/// al extraer la secuencia.
#[derive(Debug, Deserialize, Default)]
pub struct VrpResponse {
    #[serde(default)]
    pub solution: Option<VrpSolution>,
}

#[derive(Debug, Deserialize, Default)]
pub struct VrpSolution {
    #[serde(default)]
    pub routes: Option<Vec<VrpRoute>>,
}

/// Ruta (tour) de un vehículo
#[derive(Debug, Deserialize, Default)]
pub struct VrpRoute {
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub activities: Option<Vec<VrpActivity>>,
}

/// Actividad dentro de la ruta (`start`, `service`, `end`...)
#[derive(Debug, Deserialize)]
pub struct VrpActivity {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
}
