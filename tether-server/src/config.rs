//! Server configuration
//!
//! Bind address and the timeline of simulated tasks.

use anyhow::{Context, Result};
use std::time::Duration;

/// Timeline every simulated task follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    /// How long a task reports `pending` after submission
    pub pending_for: Duration,

    /// How long a task then reports `processing` before finishing
    pub work_for: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pending_for: Duration::from_millis(1000),
            work_for: Duration::from_millis(4000),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub bind_addr: String,

    pub simulation: SimulationConfig,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - TETHER_BIND_ADDR (optional, default: 0.0.0.0:8080)
    /// - TETHER_PENDING_MS (optional, default: 1000)
    /// - TETHER_WORK_MS (optional, default: 4000)
    pub fn from_env() -> Result<Self> {
        let defaults = SimulationConfig::default();

        let bind_addr =
            std::env::var("TETHER_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let pending_for = millis_from_env("TETHER_PENDING_MS")?.unwrap_or(defaults.pending_for);
        let work_for = millis_from_env("TETHER_WORK_MS")?.unwrap_or(defaults.work_for);

        Ok(Self {
            bind_addr,
            simulation: SimulationConfig {
                pending_for,
                work_for,
            },
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.simulation.work_for.is_zero() {
            anyhow::bail!("work_for must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            simulation: SimulationConfig::default(),
        }
    }
}

fn millis_from_env(name: &str) -> Result<Option<Duration>> {
    match std::env::var(name) {
        Ok(raw) => {
            let millis = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a number of milliseconds, got {:?}", name, raw))?;
            Ok(Some(Duration::from_millis(millis)))
        }
        Err(_) => Ok(None),
    }
}
