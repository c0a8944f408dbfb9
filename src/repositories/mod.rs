//! Repositorios
//!
//! Acceso al almacén de registros (conductores, pedidos, rutas, paradas).

pub mod memory_route_store;
pub mod route_repository;
pub mod route_store;

pub use memory_route_store::InMemoryRouteStore;
pub use route_repository::RouteRepository;
pub use route_store::{RouteStore, StoreError};
