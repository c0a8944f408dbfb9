//! Materializador de rutas
//!
//! Recorre la secuencia elegida tramo a tramo y produce las paradas, las
//! asignaciones de pedidos y los totales de la ruta. Este bucle define la
//! semántica de tiempos: el tiempo de viaje se redondea por tramo, antes de
//! acumularse, y el ETA incluye el servicio de la propia parada.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use super::sequencing::StopCandidate;
use crate::models::{MaterializedRoute, OrderAssignment, OrderStatus, RouteTotals, Stop};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::geo::{distance_km, Coordinate};

/// Velocidad media usada para estimar tiempos de viaje
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 40.0;

#[derive(Debug, Clone, Copy)]
pub struct RouteMaterializer {
    average_speed_kmh: f64,
}

impl Default for RouteMaterializer {
    fn default() -> Self {
        Self::new(DEFAULT_AVERAGE_SPEED_KMH)
    }
}

impl RouteMaterializer {
    pub fn new(average_speed_kmh: f64) -> Self {
        Self { average_speed_kmh }
    }

    /// Minutos de viaje de un tramo, redondeados
    pub fn travel_minutes(&self, leg_km: f64) -> i32 {
        (leg_km / self.average_speed_kmh * 60.0).round() as i32
    }

    pub fn materialize(
        &self,
        route_id: Uuid,
        driver_id: Uuid,
        start: Coordinate,
        candidates: &[StopCandidate],
        sequence: &[Uuid],
        reference_time: DateTime<Utc>,
    ) -> AppResult<MaterializedRoute> {
        let by_id: HashMap<Uuid, &StopCandidate> = candidates.iter().map(|c| (c.id, c)).collect();

        let mut stops = Vec::with_capacity(sequence.len());
        let mut assignments = Vec::with_capacity(sequence.len());
        let mut position = start;
        let mut total_km = 0.0;
        let mut elapsed_minutes: i32 = 0;

        for (index, candidate_id) in sequence.iter().enumerate() {
            let candidate = by_id.get(candidate_id).ok_or_else(|| {
                AppError::OptimizationFailed(format!("sequence references unknown order {}", candidate_id))
            })?;
            let stop_number = (index + 1) as i32;

            let leg_km = distance_km(position, candidate.coordinate);
            let leg_minutes = self.travel_minutes(leg_km);
            elapsed_minutes = i32::try_from(candidate.service_minutes())
                .ok()
                .and_then(|service| leg_minutes.checked_add(service))
                .and_then(|leg_total| elapsed_minutes.checked_add(leg_total))
                .ok_or_else(|| {
                    AppError::OptimizationFailed(format!("route duration overflows at order {}", candidate.id))
                })?;
            let eta = reference_time
                .checked_add_signed(Duration::minutes(i64::from(elapsed_minutes)))
                .ok_or_else(|| AppError::OptimizationFailed(format!("ETA out of range for order {}", candidate.id)))?;

            stops.push(Stop {
                id: Uuid::new_v4(),
                route_id,
                order_id: candidate.id,
                stop_index: stop_number,
                eta,
                distance_from_prev_km: leg_km,
                travel_time_from_prev_minutes: leg_minutes,
            });

            assignments.push(OrderAssignment {
                order_id: candidate.id,
                route_id,
                driver_id,
                stop_number,
                status: OrderStatus::Assigned,
            });

            position = candidate.coordinate;
            total_km += leg_km;
        }

        Ok(MaterializedRoute {
            stops,
            assignments,
            totals: RouteTotals {
                total_distance_km: total_km,
                total_time_minutes: elapsed_minutes,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sequencing::nearest_neighbor_order;

    fn reference_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-10T08:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn candidate(lat: f64, lng: f64) -> StopCandidate {
        StopCandidate::new(Uuid::new_v4(), Coordinate::new(lat, lng))
    }

    #[test]
    fn test_travel_minutes_rounding() {
        let m = RouteMaterializer::default();
        assert_eq!(m.travel_minutes(0.0), 0);
        assert_eq!(m.travel_minutes(40.0), 60);
        assert_eq!(m.travel_minutes(1.0), 2); // 1.5 -> 2
        assert_eq!(m.travel_minutes(0.3), 0); // 0.45 -> 0
    }

    #[test]
    fn test_equator_scenario() {
        let start = Coordinate::new(0.0, 0.0);
        let b = candidate(0.0, 1.0);
        let c = candidate(0.0, 3.0);
        let candidates = vec![c.clone(), b.clone()];

        let sequence = nearest_neighbor_order(&candidates, start);
        assert_eq!(sequence, vec![b.id, c.id]);

        let route_id = Uuid::new_v4();
        let driver_id = Uuid::new_v4();
        let plan = RouteMaterializer::default()
            .materialize(route_id, driver_id, start, &candidates, &sequence, reference_time())
            .unwrap();

        assert_eq!(plan.stops.len(), 2);
        assert!((plan.stops[0].distance_from_prev_km - 111.19).abs() < 0.01);
        assert!((plan.stops[1].distance_from_prev_km - 222.39).abs() < 0.01);
        assert_eq!(plan.stops[0].travel_time_from_prev_minutes, 167);
        // 222.39 km / 40 km/h = 333.58 min
        assert_eq!(plan.stops[1].travel_time_from_prev_minutes, 334);

        // 167 + 5, después 334 + 5
        assert_eq!(plan.stops[0].eta, reference_time() + Duration::minutes(172));
        assert_eq!(plan.stops[1].eta, reference_time() + Duration::minutes(511));

        assert!((plan.totals.total_distance_km - 333.58).abs() < 0.01);
        assert_eq!(plan.totals.total_time_minutes, 511);
    }

    #[test]
    fn test_invariants_over_a_realistic_route() {
        let start = Coordinate::new(48.8566, 2.3522);
        let mut candidates: Vec<_> = (0..12)
            .map(|i| candidate(48.80 + (i * 3 % 7) as f64 * 0.02, 2.28 + (i * 5 % 9) as f64 * 0.02))
            .collect();
        candidates[3].service_minutes = Some(15);
        candidates[7].service_minutes = Some(0);

        let sequence = nearest_neighbor_order(&candidates, start);
        let route_id = Uuid::new_v4();
        let driver_id = Uuid::new_v4();
        let plan = RouteMaterializer::default()
            .materialize(route_id, driver_id, start, &candidates, &sequence, reference_time())
            .unwrap();

        assert_eq!(plan.stops.len(), candidates.len());
        assert_eq!(plan.assignments.len(), candidates.len());

        let leg_sum: f64 = plan.stops.iter().map(|s| s.distance_from_prev_km).sum();
        assert!((leg_sum - plan.totals.total_distance_km).abs() < 1e-9);

        for (i, stop) in plan.stops.iter().enumerate() {
            assert_eq!(stop.stop_index, i as i32 + 1);
            assert_eq!(stop.route_id, route_id);
            assert_eq!(stop.order_id, sequence[i]);
        }

        let first = candidates.iter().find(|c| c.id == sequence[0]).unwrap();
        assert_eq!(plan.stops[0].distance_from_prev_km, distance_km(start, first.coordinate));

        for pair in plan.stops.windows(2) {
            assert!(pair[0].eta <= pair[1].eta);
        }

        let expected_minutes: i32 = plan
            .stops
            .iter()
            .map(|s| {
                let c = candidates.iter().find(|c| c.id == s.order_id).unwrap();
                s.travel_time_from_prev_minutes + c.service_minutes() as i32
            })
            .sum();
        assert_eq!(plan.totals.total_time_minutes, expected_minutes);
        assert_eq!(
            plan.stops.last().unwrap().eta,
            reference_time() + Duration::minutes(expected_minutes as i64)
        );

        for (i, assignment) in plan.assignments.iter().enumerate() {
            assert_eq!(assignment.order_id, sequence[i]);
            assert_eq!(assignment.route_id, route_id);
            assert_eq!(assignment.driver_id, driver_id);
            assert_eq!(assignment.stop_number, i as i32 + 1);
            assert_eq!(assignment.status, OrderStatus::Assigned);
        }
    }

    #[test]
    fn test_empty_sequence_gives_zero_totals() {
        let plan = RouteMaterializer::default()
            .materialize(
                Uuid::new_v4(),
                Uuid::new_v4(),
                Coordinate::new(0.0, 0.0),
                &[],
                &[],
                reference_time(),
            )
            .unwrap();

        assert!(plan.stops.is_empty());
        assert!(plan.assignments.is_empty());
        assert_eq!(plan.totals, RouteTotals::default());
    }

    #[test]
    fn test_stop_at_start_position_costs_only_service_time() {
        let start = Coordinate::new(45.0, 5.0);
        let here = StopCandidate {
            service_minutes: Some(8),
            ..candidate(45.0, 5.0)
        };

        let plan = RouteMaterializer::default()
            .materialize(Uuid::new_v4(), Uuid::new_v4(), start, &[here.clone()], &[here.id], reference_time())
            .unwrap();

        assert_eq!(plan.stops[0].distance_from_prev_km, 0.0);
        assert_eq!(plan.stops[0].travel_time_from_prev_minutes, 0);
        assert_eq!(plan.totals.total_time_minutes, 8);
    }

    #[test]
    fn test_unknown_id_in_sequence_is_an_error() {
        let a = candidate(0.0, 1.0);
        let err = RouteMaterializer::default()
            .materialize(
                Uuid::new_v4(),
                Uuid::new_v4(),
                Coordinate::new(0.0, 0.0),
                &[a.clone()],
                &[a.id, Uuid::new_v4()],
                reference_time(),
            )
            .unwrap_err();

        assert!(matches!(err, AppError::OptimizationFailed(_)));
    }

    #[test]
    fn test_huge_service_times_fail_instead_of_overflowing() {
        let start = Coordinate::new(0.0, 0.0);
        let a = StopCandidate {
            service_minutes: Some(i32::MAX as u32),
            ..candidate(0.0, 1.0)
        };
        let b = candidate(0.0, 2.0);

        let err = RouteMaterializer::default()
            .materialize(
                Uuid::new_v4(),
                Uuid::new_v4(),
                start,
                &[a.clone(), b.clone()],
                &[a.id, b.id],
                reference_time(),
            )
            .unwrap_err();
        assert!(matches!(err, AppError::OptimizationFailed(_)));

        let c = StopCandidate {
            service_minutes: Some(u32::MAX),
            ..candidate(0.0, 1.0)
        };
        let err = RouteMaterializer::default()
            .materialize(Uuid::new_v4(), Uuid::new_v4(), start, &[c.clone()], &[c.id], reference_time())
            .unwrap_err();
        assert!(matches!(err, AppError::OptimizationFailed(_)));
    }

    #[test]
    fn test_custom_average_speed() {
        let start = Coordinate::new(0.0, 0.0);
        let b = candidate(0.0, 1.0);
        let plan = RouteMaterializer::new(80.0)
            .materialize(Uuid::new_v4(), Uuid::new_v4(), start, &[b.clone()], &[b.id], reference_time())
            .unwrap();

        // 111.19 km / 80 km/h = 83.4 min
        assert_eq!(plan.stops[0].travel_time_from_prev_minutes, 83);
    }
}
