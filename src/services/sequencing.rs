//! Estrategias de secuenciación de paradas
//!
//! Una estrategia recibe la posición de salida del vehículo y los candidatos
//! (pedidos) y devuelve el orden de visita como lista de ids. Hay dos
//! implementaciones con el mismo contrato: el solver externo
//! (`solver_service::GraphHopperSolver`) y la heurística local del vecino más
//! cercano, que nunca falla y se usa como respaldo.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::solver_service::SolverError;
use crate::utils::geo::{distance_km, Coordinate};

/// Tiempo de servicio por parada cuando el pedido no lo especifica
pub const DEFAULT_SERVICE_MINUTES: u32 = 5;

/// Tiempo de servicio máximo aceptado para una parada (un día)
pub const MAX_SERVICE_MINUTES: u32 = 24 * 60;

/// Orden de visita: permutación de los ids de los candidatos
pub type Sequence = Vec<Uuid>;

/// Pedido candidato a formar parte de la ruta
#[derive(Debug, Clone, PartialEq)]
pub struct StopCandidate {
    pub id: Uuid,
    pub coordinate: Coordinate,
    pub service_minutes: Option<u32>,
    pub label: Option<String>,
}

impl StopCandidate {
    pub fn new(id: Uuid, coordinate: Coordinate) -> Self {
        Self {
            id,
            coordinate,
            service_minutes: None,
            label: None,
        }
    }

    pub fn service_minutes(&self) -> u32 {
        self.service_minutes.unwrap_or(DEFAULT_SERVICE_MINUTES)
    }
}

/// Vehículo que recorre la ruta y su posición de salida
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleStart {
    pub vehicle_id: Uuid,
    pub position: Coordinate,
}

/// La estrategia no pudo producir una secuencia válida; hay que usar el respaldo
#[derive(Debug, Error)]
#[error("solver unavailable: {0}")]
pub struct NeedsFallback(#[from] pub SolverError);

#[async_trait]
pub trait SequencingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn sequence(
        &self,
        vehicle: &VehicleStart,
        candidates: &[StopCandidate],
    ) -> Result<Sequence, NeedsFallback>;
}

/// Heurística local: construcción por vecino más cercano
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborStrategy;

#[async_trait]
impl SequencingStrategy for NearestNeighborStrategy {
    fn name(&self) -> &'static str {
        "nearest_neighbor"
    }

    async fn sequence(
        &self,
        vehicle: &VehicleStart,
        candidates: &[StopCandidate],
    ) -> Result<Sequence, NeedsFallback> {
        Ok(nearest_neighbor_order(candidates, vehicle.position))
    }
}

/// Recorrido por vecino más cercano desde `start`.
///
/// En cada paso se elige el candidato restante más cercano a la posición
/// actual. Los empates se resuelven a favor del primero en el orden restante,
/// así que el resultado sólo depende del orden de entrada. O(n²).
pub fn nearest_neighbor_order(candidates: &[StopCandidate], start: Coordinate) -> Sequence {
    let mut remaining: Vec<&StopCandidate> = candidates.iter().collect();
    let mut sequence = Vec::with_capacity(candidates.len());
    let mut current = start;

    while !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;

        for (idx, candidate) in remaining.iter().enumerate() {
            let d = distance_km(current, candidate.coordinate);
            if d < best_dist {
                best_dist = d;
                best_idx = idx;
            }
        }

        let next = remaining.remove(best_idx);
        sequence.push(next.id);
        current = next.coordinate;
    }

    sequence
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(lat: f64, lng: f64) -> StopCandidate {
        StopCandidate::new(Uuid::new_v4(), Coordinate::new(lat, lng))
    }

    fn sorted(ids: &[Uuid]) -> Vec<Uuid> {
        let mut ids = ids.to_vec();
        ids.sort();
        ids
    }

    #[test]
    fn test_empty_candidates_give_empty_sequence() {
        assert!(nearest_neighbor_order(&[], Coordinate::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_closer_stop_first() {
        let b = candidate(0.0, 1.0);
        let c = candidate(0.0, 3.0);
        let sequence = nearest_neighbor_order(&[c.clone(), b.clone()], Coordinate::new(0.0, 0.0));
        assert_eq!(sequence, vec![b.id, c.id]);
    }

    #[test]
    fn test_output_is_permutation_of_input() {
        let candidates: Vec<_> = (0..25)
            .map(|i| candidate(48.0 + (i * 7 % 11) as f64 * 0.01, 2.0 + (i * 5 % 13) as f64 * 0.01))
            .collect();
        let input_ids: Vec<Uuid> = candidates.iter().map(|c| c.id).collect();

        let sequence = nearest_neighbor_order(&candidates, Coordinate::new(48.05, 2.05));

        assert_eq!(sequence.len(), candidates.len());
        assert_eq!(sorted(&sequence), sorted(&input_ids));
    }

    #[test]
    fn test_duplicate_ids_are_kept() {
        let a = candidate(0.0, 1.0);
        let b = candidate(0.0, 2.0);
        let candidates = vec![a.clone(), b.clone(), a.clone()];

        let sequence = nearest_neighbor_order(&candidates, Coordinate::new(0.0, 0.0));

        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.iter().filter(|id| **id == a.id).count(), 2);
        assert_eq!(sequence.iter().filter(|id| **id == b.id).count(), 1);
    }

    #[test]
    fn test_ties_go_to_first_in_input_order() {
        // Equidistantes desde el origen
        let east = candidate(0.0, 1.0);
        let west = candidate(0.0, -1.0);

        let sequence = nearest_neighbor_order(&[east.clone(), west.clone()], Coordinate::new(0.0, 0.0));
        assert_eq!(sequence[0], east.id);

        let sequence = nearest_neighbor_order(&[west.clone(), east.clone()], Coordinate::new(0.0, 0.0));
        assert_eq!(sequence[0], west.id);
    }

    #[test]
    fn test_greedy_walk_follows_current_position() {
        // Desde el origen: a (1) es el más cercano; desde a, c (1.5) gana a b (-2)
        let a = candidate(0.0, 1.0);
        let b = candidate(0.0, -2.0);
        let c = candidate(0.0, 1.5);

        let sequence = nearest_neighbor_order(&[b.clone(), c.clone(), a.clone()], Coordinate::new(0.0, 0.0));
        assert_eq!(sequence, vec![a.id, c.id, b.id]);
    }

    #[test]
    fn test_default_service_minutes() {
        let mut c = candidate(0.0, 0.0);
        assert_eq!(c.service_minutes(), 5);
        c.service_minutes = Some(12);
        assert_eq!(c.service_minutes(), 12);
    }

    #[tokio::test]
    async fn test_strategy_never_needs_fallback() {
        let vehicle = VehicleStart {
            vehicle_id: Uuid::new_v4(),
            position: Coordinate::new(0.0, 0.0),
        };
        let candidates = vec![candidate(0.0, 2.0), candidate(0.0, 1.0)];

        let sequence = NearestNeighborStrategy
            .sequence(&vehicle, &candidates)
            .await
            .expect("heuristic never fails");

        assert_eq!(sequence, vec![candidates[1].id, candidates[0].id]);
    }
}
