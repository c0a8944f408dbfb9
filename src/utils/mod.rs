//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores y cálculo de
//! distancias geográficas.

pub mod errors;
pub mod geo;
