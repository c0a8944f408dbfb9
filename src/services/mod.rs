//! Services module
//!
//! Este módulo contiene la lógica de negocio del motor de secuenciación:
//! estrategias (solver externo y heurística local), materialización de
//! rutas y el orquestador que las combina.

pub mod route_materializer;
pub mod route_optimization_service;
pub mod sequencing;
pub mod solver_service;

pub use route_materializer::RouteMaterializer;
pub use route_optimization_service::RouteOptimizationService;
pub use sequencing::{nearest_neighbor_order, NearestNeighborStrategy, SequencingStrategy, StopCandidate};
pub use solver_service::GraphHopperSolver;
