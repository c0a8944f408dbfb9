//! Controladores HTTP

pub mod route_optimization_controller;
