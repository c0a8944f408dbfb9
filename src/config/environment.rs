//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. La configuración del
//! solver es opcional: sin `GRAPHHOPPER_API_KEY` el servicio sólo usa la
//! heurística local.

use anyhow::{anyhow, Context, Result};
use std::str::FromStr;
use std::time::Duration;

use crate::services::route_materializer::DEFAULT_AVERAGE_SPEED_KMH;

pub const DEFAULT_SOLVER_URL: &str = "https://graphhopper.com/api/1/vrp";
pub const DEFAULT_SOLVER_TIMEOUT_SECS: u64 = 30;

/// Configuración del solver externo
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub api_key: String,
    pub api_url: String,
    pub timeout: Duration,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub solver: Option<SolverConfig>,
    pub average_speed_kmh: f64,
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Leer la configuración de una fuente arbitraria de claves
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let solver = match get("GRAPHHOPPER_API_KEY") {
            Some(api_key) => Some(SolverConfig {
                api_key,
                api_url: get("GRAPHHOPPER_API_URL").unwrap_or_else(|| DEFAULT_SOLVER_URL.to_string()),
                timeout: Duration::from_secs(parse_or(
                    get("SOLVER_TIMEOUT_SECS"),
                    "SOLVER_TIMEOUT_SECS",
                    DEFAULT_SOLVER_TIMEOUT_SECS,
                )?),
            }),
            None => None,
        };

        let average_speed_kmh = parse_or(get("AVERAGE_SPEED_KMH"), "AVERAGE_SPEED_KMH", DEFAULT_AVERAGE_SPEED_KMH)?;
        if !(average_speed_kmh.is_finite() && average_speed_kmh > 0.0) {
            return Err(anyhow!("AVERAGE_SPEED_KMH must be a positive number"));
        }

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: parse_or(get("PORT"), "PORT", 3000)?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            cors_origins: get("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            solver,
            average_speed_kmh,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a valid number, got '{}'", key, raw)),
        None => Ok(default),
    }
}
