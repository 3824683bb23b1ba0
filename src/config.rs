use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AcoError, AcoResult};

pub mod constant {
    pub(crate) const LOCATION_COUNT: usize = 58;
    pub(crate) const START_NODE: usize = 0;
    pub(crate) const END_NODE: usize = 15;
    pub(crate) const SEED: u64 = 64;
    pub(crate) const HISTORY_CSV_PATH: &str = "convergence.csv";
    pub(crate) const SUMMARY_JSON_PATH: &str = "best_tour.json";
    // Bounding box for generated nodes (lat, lon), roughly northern Algeria.
    pub(crate) const LAT_RANGE: (f64, f64) = (19.0, 37.0);
    pub(crate) const LON_RANGE: (f64, f64) = (-8.5, 12.0);
}

/// Algorithm parameters, captured once when a colony is built.
/// Changing any of them means building a new colony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoConfig {
    pub num_ants: usize,
    /// Pheromone weight (α).
    pub alpha: f64,
    /// Inverse-distance weight (β).
    pub beta: f64,
    /// ρ, in [0, 1).
    pub evaporation_rate: f64,
    /// Q, scales `Q / cost` deposits.
    pub deposit_factor: f64,
    pub max_iterations: usize,
    /// τ₀, must be strictly positive.
    pub initial_pheromone: f64,
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        AcoConfig {
            num_ants: 30,
            alpha: 1.0,
            beta: 5.0,
            evaporation_rate: 0.5,
            deposit_factor: 100.0,
            max_iterations: 200,
            initial_pheromone: 1.0,
            seed: None,
        }
    }
}

impl AcoConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter against its domain.
    pub fn validate(&self) -> AcoResult<()> {
        if self.num_ants < 1 {
            return Err(AcoError::config("num_ants", "must be at least 1"));
        }
        if self.max_iterations < 1 {
            return Err(AcoError::config("max_iterations", "must be at least 1"));
        }
        non_negative("alpha", self.alpha)?;
        non_negative("beta", self.beta)?;
        non_negative("deposit_factor", self.deposit_factor)?;
        non_negative("evaporation_rate", self.evaporation_rate)?;
        if self.evaporation_rate >= 1.0 {
            return Err(AcoError::config(
                "evaporation_rate",
                format!("must be in [0, 1), got {}", self.evaporation_rate),
            ));
        }
        if !self.initial_pheromone.is_finite() || self.initial_pheromone <= 0.0 {
            return Err(AcoError::config(
                "initial_pheromone",
                format!("must be a finite value > 0, got {}", self.initial_pheromone),
            ));
        }
        Ok(())
    }

    /// Defaults overridden by `ACO_*` environment variables. Call
    /// `dotenv().ok()` beforehand to pick up a `.env` file.
    pub fn from_env() -> AcoResult<Self> {
        let defaults = AcoConfig::default();
        let config = AcoConfig {
            num_ants: env_or("ACO_NUM_ANTS", "num_ants", defaults.num_ants)?,
            alpha: env_or("ACO_ALPHA", "alpha", defaults.alpha)?,
            beta: env_or("ACO_BETA", "beta", defaults.beta)?,
            evaporation_rate: env_or(
                "ACO_EVAPORATION_RATE",
                "evaporation_rate",
                defaults.evaporation_rate,
            )?,
            deposit_factor: env_or("ACO_DEPOSIT_FACTOR", "deposit_factor", defaults.deposit_factor)?,
            max_iterations: env_or("ACO_MAX_ITERATIONS", "max_iterations", defaults.max_iterations)?,
            initial_pheromone: env_or(
                "ACO_INITIAL_PHEROMONE",
                "initial_pheromone",
                defaults.initial_pheromone,
            )?,
            seed: match env::var("ACO_SEED") {
                Ok(raw) => Some(parse_field("seed", &raw)?),
                Err(_) => defaults.seed,
            },
        };
        config.validate()?;
        Ok(config)
    }
}

fn non_negative(field: &'static str, value: f64) -> AcoResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AcoError::config(
            field,
            format!("must be a finite value >= 0, got {value}"),
        ))
    }
}

fn env_or<T: FromStr>(key: &str, field: &'static str, default: T) -> AcoResult<T> {
    match env::var(key) {
        Ok(raw) => parse_field(field, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_field<T: FromStr>(field: &'static str, raw: &str) -> AcoResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AcoError::config(field, format!("cannot parse {raw:?}")))
}
