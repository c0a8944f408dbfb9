//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean las tablas
//! `drivers`, `orders`, `routes` y `stops`.

pub mod driver;
pub mod order;
pub mod route;

pub use driver::*;
pub use order::*;
pub use route::*;
