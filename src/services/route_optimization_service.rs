//! Servicio de optimización de rutas
//!
//! Orquesta una optimización completa: valida la solicitud, lee conductor y
//! pedidos, elige la estrategia (solver externo si está configurado, vecino
//! más cercano si no o si el solver falla), materializa la ruta y la persiste
//! en una sola operación atómica.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::route_materializer::RouteMaterializer;
use super::sequencing::{
    NearestNeighborStrategy, Sequence, SequencingStrategy, StopCandidate, VehicleStart, MAX_SERVICE_MINUTES,
};
use super::solver_service::GraphHopperSolver;
use crate::config::environment::EnvironmentConfig;
use crate::models::{Order, Route, RouteDetails, RouteStatus};
use crate::repositories::route_store::RouteStore;
use crate::utils::errors::{invalid_request, AppError, AppResult};

pub struct RouteOptimizationService {
    store: Arc<dyn RouteStore>,
    solver: Option<Arc<dyn SequencingStrategy>>,
    fallback: NearestNeighborStrategy,
    materializer: RouteMaterializer,
}

impl RouteOptimizationService {
    pub fn new(
        store: Arc<dyn RouteStore>,
        solver: Option<Arc<dyn SequencingStrategy>>,
        materializer: RouteMaterializer,
    ) -> Self {
        Self {
            store,
            solver,
            fallback: NearestNeighborStrategy,
            materializer,
        }
    }

    /// Crear el servicio a partir de la configuración: el solver sólo se
    /// construye si hay API key
    pub fn from_config(store: Arc<dyn RouteStore>, config: &EnvironmentConfig) -> Result<Self, reqwest::Error> {
        let solver: Option<Arc<dyn SequencingStrategy>> = match &config.solver {
            Some(solver_config) => {
                log::info!("🧭 Solver externo configurado: {}", solver_config.api_url);
                Some(Arc::new(GraphHopperSolver::new(solver_config.clone())?))
            }
            None => {
                log::info!("🧭 Sin solver externo, se usará la heurística local");
                None
            }
        };

        Ok(Self::new(store, solver, RouteMaterializer::new(config.average_speed_kmh)))
    }

    pub fn solver_enabled(&self) -> bool {
        self.solver.is_some()
    }

    /// Optimizar y persistir una ruta para `driver_id` con los pedidos `order_ids`
    pub async fn optimize(&self, driver_id: &str, order_ids: &[String]) -> AppResult<RouteDetails> {
        let (driver_id, order_ids) = parse_request(driver_id, order_ids)?;

        let driver = self
            .store
            .find_driver(driver_id)
            .await?
            .ok_or(AppError::DriverNotFound(driver_id))?;

        let orders = self.fetch_orders(&order_ids).await?;
        let candidates = orders
            .iter()
            .map(to_candidate)
            .collect::<AppResult<Vec<_>>>()?;

        let vehicle = VehicleStart {
            vehicle_id: driver.id,
            position: driver.current_location().unwrap_or(candidates[0].coordinate),
        };

        log::info!(
            "🎯 Optimizando ruta para conductor {} con {} pedidos",
            driver.id,
            candidates.len()
        );

        let sequence = self.choose_sequence(&vehicle, &candidates).await?;

        let now = Utc::now();
        let route = Route {
            id: Uuid::new_v4(),
            driver_id: driver.id,
            status: RouteStatus::Planned,
            total_distance_km: 0.0,
            total_time_minutes: 0,
            created_at: now,
        };

        let plan = self
            .materializer
            .materialize(route.id, driver.id, vehicle.position, &candidates, &sequence, now)?;

        self.store
            .save_route_plan(&route, &plan)
            .await
            .map_err(|e| AppError::OptimizationFailed(e.to_string()))?;

        let details = self
            .store
            .find_route(route.id)
            .await
            .map_err(|e| AppError::OptimizationFailed(e.to_string()))?
            .ok_or_else(|| AppError::OptimizationFailed(format!("route {} missing after save", route.id)))?;

        log::info!(
            "✅ Ruta {} creada: {} paradas, {:.2} km, {} min",
            route.id,
            plan.stops.len(),
            plan.totals.total_distance_km,
            plan.totals.total_time_minutes
        );

        Ok(details)
    }

    pub async fn list_routes(&self) -> AppResult<Vec<RouteDetails>> {
        Ok(self.store.list_routes().await?)
    }

    pub async fn get_route(&self, route_id: Uuid) -> AppResult<RouteDetails> {
        self.store
            .find_route(route_id)
            .await?
            .ok_or(AppError::RouteNotFound(route_id))
    }

    /// Pedidos encontrados, en el orden en que se pidieron. Los ids que no
    /// existen se ignoran con un aviso.
    async fn fetch_orders(&self, order_ids: &[Uuid]) -> AppResult<Vec<Order>> {
        let mut orders = self.store.find_orders(order_ids).await?;
        if orders.is_empty() {
            return Err(AppError::OrdersNotFound);
        }

        let rank: HashMap<Uuid, usize> = order_ids
            .iter()
            .enumerate()
            .rev()
            .map(|(idx, id)| (*id, idx))
            .collect();
        orders.sort_by_key(|o| rank.get(&o.id).copied().unwrap_or(usize::MAX));

        let missing: Vec<String> = order_ids
            .iter()
            .filter(|id| !orders.iter().any(|o| o.id == **id))
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            log::warn!("⚠️ {} pedidos no encontrados, se ignoran: {}", missing.len(), missing.join(", "));
        }

        Ok(orders)
    }

    /// Solver (si existe) y después la heurística local; la primera secuencia válida gana
    async fn choose_sequence(&self, vehicle: &VehicleStart, candidates: &[StopCandidate]) -> AppResult<Sequence> {
        let mut strategies: Vec<&dyn SequencingStrategy> = Vec::with_capacity(2);
        if let Some(solver) = &self.solver {
            strategies.push(solver.as_ref());
        }
        strategies.push(&self.fallback);

        for strategy in strategies {
            match strategy.sequence(vehicle, candidates).await {
                Ok(sequence) => {
                    log::info!("🧭 Secuencia calculada con {}", strategy.name());
                    return Ok(sequence);
                }
                Err(fallback) => {
                    log::warn!("⚠️ {} no disponible, usando heurística local: {}", strategy.name(), fallback);
                }
            }
        }

        Err(AppError::OptimizationFailed("no sequencing strategy produced a sequence".to_string()))
    }
}

fn parse_request(driver_id: &str, order_ids: &[String]) -> AppResult<(Uuid, Vec<Uuid>)> {
    let driver_id = driver_id.trim();
    if driver_id.is_empty() || order_ids.is_empty() {
        return Err(invalid_request("driver_id and order_ids are required"));
    }

    let driver_id =
        Uuid::parse_str(driver_id).map_err(|_| invalid_request(format!("invalid driver_id '{}'", driver_id)))?;

    let order_ids = order_ids
        .iter()
        .map(|raw| Uuid::parse_str(raw.trim()).map_err(|_| invalid_request(format!("invalid order id '{}'", raw))))
        .collect::<AppResult<Vec<_>>>()?;

    Ok((driver_id, order_ids))
}

fn to_candidate(order: &Order) -> AppResult<StopCandidate> {
    let coordinate = order
        .coordinate()
        .ok_or_else(|| invalid_request(format!("order {} has no coordinates", order.id)))?;

    let service_minutes = match order.service_time_minutes {
        None => None,
        Some(minutes) => Some(
            u32::try_from(minutes)
                .ok()
                .filter(|m| *m <= MAX_SERVICE_MINUTES)
                .ok_or_else(|| {
                    invalid_request(format!(
                        "order {} has service time {} min outside 0..={}",
                        order.id, minutes, MAX_SERVICE_MINUTES
                    ))
                })?,
        ),
    };

    Ok(StopCandidate {
        id: order.id,
        coordinate,
        service_minutes,
        label: Some(order.customer_name.clone()),
    })
}
