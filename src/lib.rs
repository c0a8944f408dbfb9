//! Motor de secuenciación de rutas de reparto
//!
//! Asigna una secuencia de paradas a un vehículo, calcula distancias, tiempos
//! y ETAs por tramo y persiste el resultado como una ruta.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
