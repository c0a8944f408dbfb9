//! Adaptador del solver VRP externo
//!
//! Construye la petición para el solver, la envía por HTTP y convierte la
//! respuesta en una secuencia de ids. Cualquier fallo (red, timeout, estado
//! HTTP, JSON inválido o respuesta incompleta) se devuelve como
//! `NeedsFallback` y nunca llega al cliente.

use async_trait::async_trait;
use reqwest::{header, Client};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use super::sequencing::{NeedsFallback, Sequence, SequencingStrategy, StopCandidate, VehicleStart};
use crate::config::environment::SolverConfig;
use crate::dto::solver_dto::*;

/// Motivos por los que la respuesta del solver no es utilizable
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("solver request timed out")]
    Timeout,

    #[error("solver request failed: {0}")]
    Network(reqwest::Error),

    #[error("solver responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("solver payload could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("solver response is missing {0}")]
    MissingField(&'static str),

    #[error("solver returned unknown service id '{0}'")]
    UnknownService(String),

    #[error("solver returned service id '{0}' more times than requested")]
    DuplicateService(Uuid),

    #[error("solver returned {returned} service ids for {expected} candidates")]
    IncompleteSequence { expected: usize, returned: usize },
}

impl From<reqwest::Error> for SolverError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SolverError::Timeout
        } else {
            SolverError::Network(e)
        }
    }
}

pub struct GraphHopperSolver {
    config: SolverConfig,
    client: Client,
}

impl GraphHopperSolver {
    pub fn new(config: SolverConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent("FleetRouteOptimizer/1.0")
            .build()?;

        Ok(Self { config, client })
    }

    /// Petición con un vehículo que sale de `vehicle.position` y un servicio por candidato
    pub fn build_request(vehicle: &VehicleStart, candidates: &[StopCandidate]) -> VrpRequest {
        let vehicles = vec![VrpVehicle {
            vehicle_id: vehicle.vehicle_id.to_string(),
            start_address: VrpAddress {
                location_id: "start".to_string(),
                lat: vehicle.position.latitude,
                lon: vehicle.position.longitude,
            },
        }];

        let services = candidates
            .iter()
            .map(|candidate| {
                let id = candidate.id.to_string();
                VrpService {
                    name: candidate.label.clone().unwrap_or_else(|| id.clone()),
                    address: VrpAddress {
                        location_id: id.clone(),
                        lat: candidate.coordinate.latitude,
                        lon: candidate.coordinate.longitude,
                    },
                    id,
                    size: vec![1],
                    duration: candidate.service_minutes().saturating_mul(60),
                }
            })
            .collect();

        VrpRequest {
            vehicles,
            services,
            objectives: vec![VrpObjective::min_completion_time()],
        }
    }

    /// Ids de las actividades `service` de la primera ruta, en el orden del solver.
    ///
    /// La secuencia debe ser una permutación exacta de los candidatos: ids
    /// desconocidos, repetidos o ausentes invalidan la respuesta entera.
    pub fn extract_sequence(response: &VrpResponse, candidates: &[StopCandidate]) -> Result<Sequence, SolverError> {
        let solution = response.solution.as_ref().ok_or(SolverError::MissingField("solution"))?;
        let routes = solution.routes.as_ref().ok_or(SolverError::MissingField("solution.routes"))?;
        let route = routes.first().ok_or(SolverError::MissingField("solution.routes[0]"))?;
        let activities = route
            .activities
            .as_ref()
            .ok_or(SolverError::MissingField("solution.routes[0].activities"))?;

        let mut pending: HashMap<Uuid, usize> = HashMap::new();
        for candidate in candidates {
            *pending.entry(candidate.id).or_insert(0) += 1;
        }

        let mut sequence = Vec::with_capacity(candidates.len());
        for activity in activities.iter().filter(|a| a.activity_type == "service") {
            let Some(raw_id) = activity.id.as_deref() else {
                continue;
            };

            let id = Uuid::parse_str(raw_id).map_err(|_| SolverError::UnknownService(raw_id.to_string()))?;
            match pending.get_mut(&id) {
                None => return Err(SolverError::UnknownService(raw_id.to_string())),
                Some(0) => return Err(SolverError::DuplicateService(id)),
                Some(count) => *count -= 1,
            }
            sequence.push(id);
        }

        if sequence.len() != candidates.len() {
            return Err(SolverError::IncompleteSequence {
                expected: candidates.len(),
                returned: sequence.len(),
            });
        }

        Ok(sequence)
    }

    /// Enviar el problema al solver y parsear la respuesta
    async fn submit(&self, request: &VrpRequest) -> Result<VrpResponse, SolverError> {
        log::info!("📤 Enviando problema VRP a: {}", self.config.api_url);

        let response = self
            .client
            .post(&self.config.api_url)
            .header(header::AUTHORIZATION, &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        log::info!("📡 Solver response status: {}", status);
        log::debug!("📄 Solver response body: {}", response_text);

        if !status.is_success() {
            return Err(SolverError::Status {
                status: status.as_u16(),
                body: response_text,
            });
        }

        Ok(serde_json::from_str(&response_text)?)
    }
}

#[async_trait]
impl SequencingStrategy for GraphHopperSolver {
    fn name(&self) -> &'static str {
        "graphhopper"
    }

    async fn sequence(
        &self,
        vehicle: &VehicleStart,
        candidates: &[StopCandidate],
    ) -> Result<Sequence, NeedsFallback> {
        log::info!("🚀 Optimizando {} paradas con el solver externo", candidates.len());

        let request = Self::build_request(vehicle, candidates);
        let response = self.submit(&request).await?;
        let sequence = Self::extract_sequence(&response, candidates)?;

        log::info!("🎯 Secuencia obtenida del solver: {} paradas", sequence.len());
        Ok(sequence)
    }
}
