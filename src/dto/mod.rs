//! DTOs (Data Transfer Objects)
//!
//! Estructuras de entrada de la API y formato de intercambio con el solver.

pub mod route_optimization_dto;
pub mod solver_dto;
