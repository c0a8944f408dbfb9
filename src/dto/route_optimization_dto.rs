//! DTOs del endpoint de optimización

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request de optimización: un conductor y los pedidos a secuenciar
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct OptimizeRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub driver_id: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub order_ids: Vec<String>,
}
