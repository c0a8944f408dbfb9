//! Utilidades geográficas
//!
//! Distancia de gran círculo (haversine) entre dos coordenadas. Es la métrica
//! de referencia para todos los cálculos de tiempo y ETA del motor.

use serde::{Deserialize, Serialize};

/// Radio medio de la Tierra en kilómetros
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Coordenada geográfica en grados decimales
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Distancia haversine en kilómetros entre `a` y `b`
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_DEGREE_KM: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

    #[test]
    fn test_distance_to_itself_is_zero() {
        let paris = Coordinate::new(48.8566, 2.3522);
        assert_eq!(distance_km(paris, paris), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let points = [
            Coordinate::new(48.8566, 2.3522),
            Coordinate::new(45.7640, 4.8357),
            Coordinate::new(-33.8688, 151.2093),
            Coordinate::new(0.0, 179.9),
            Coordinate::new(0.0, -179.9),
        ];

        for a in points {
            for b in points {
                let ab = distance_km(a, b);
                let ba = distance_km(b, a);
                assert!((ab - ba).abs() < 1e-9, "{:?} <-> {:?}: {} != {}", a, b, ab, ba);
            }
        }
    }

    #[test]
    fn test_one_degree_along_equator() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!((d - ONE_DEGREE_KM).abs() < 1e-9);
        assert!((d - 111.19).abs() < 0.01);
    }

    #[test]
    fn test_antimeridian_is_short() {
        let d = distance_km(Coordinate::new(0.0, 179.5), Coordinate::new(0.0, -179.5));
        assert!((d - ONE_DEGREE_KM).abs() < 1e-6);
    }

    #[test]
    fn test_paris_lyon() {
        let paris = Coordinate::new(48.8566, 2.3522);
        let lyon = Coordinate::new(45.7640, 4.8357);
        let d = distance_km(paris, lyon);
        // ~392 km en línea recta
        assert!(d > 390.0 && d < 395.0, "distancia inesperada: {}", d);
    }
}
