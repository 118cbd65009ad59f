//! Configuration loader for the `cloudburst-sentinel` backend service.
//!
//! This module centralizes all runtime configuration values and their
//! defaults, loading from environment variables (with optional `.env` file
//! support provided by the caller). By consolidating configuration logic
//! here, we avoid scattering `env::var` calls throughout the codebase.
//! Every knob has a default, so the service runs with an empty
//! environment.

use std::env;

use anyhow::{anyhow, bail, Result};

/// Parse an optional environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional environment variable with no default.
macro_rules! parse_env_opt {
    ($var_name:expr, $ty:ty) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent
/// configuration snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Countdown length between acquisition cycles, in seconds.
    pub cycle_length_secs: u32,

    /// Rolling-window size for each historized metric.
    pub history_capacity: usize,

    /// Number of telemetry grid rows sampled per cycle.
    pub grid_batch_size: u32,

    /// Per-cycle probability of the severe synthetic regime.
    pub severe_probability: f64,

    /// Simulated acquisition latency, in milliseconds.
    pub acquisition_latency_ms: u64,

    /// Monitored-site reference latitude for the telemetry grid.
    pub site_latitude: f64,

    /// Monitored-site reference longitude for the telemetry grid.
    pub site_longitude: f64,

    /// Optional seed pinning the random source for reproducible sessions.
    pub rng_seed: Option<u64>,

    /// HTTP listen port.
    pub bind_port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `CYCLE_LENGTH_SECS` – countdown length (default: 30)
/// - `HISTORY_CAPACITY` – rolling-window size (default: 20)
/// - `GRID_BATCH_SIZE` – telemetry rows per cycle (default: 15)
/// - `SEVERE_REGIME_PROBABILITY` – severe-regime chance (default: 0.2)
/// - `ACQUISITION_LATENCY_MS` – simulated feed latency (default: 1500)
/// - `SITE_LATITUDE` / `SITE_LONGITUDE` – grid reference point
///   (default: 18.5, 74.0)
/// - `RNG_SEED` – pin the random source (default: unset)
/// - `BIND_PORT` – HTTP listen port (default: 8080)
///
/// Returns an error if any variable is present but unparseable, or if a
/// parsed value fails validation.
pub fn load_from_env() -> Result<Config> {
    // ---
    let config = Config {
        cycle_length_secs: parse_env!("CYCLE_LENGTH_SECS", u32, 30),
        history_capacity: parse_env!("HISTORY_CAPACITY", usize, 20),
        grid_batch_size: parse_env!("GRID_BATCH_SIZE", u32, 15),
        severe_probability: parse_env!("SEVERE_REGIME_PROBABILITY", f64, 0.2),
        acquisition_latency_ms: parse_env!("ACQUISITION_LATENCY_MS", u64, 1500),
        site_latitude: parse_env!("SITE_LATITUDE", f64, 18.5),
        site_longitude: parse_env!("SITE_LONGITUDE", f64, 74.0),
        rng_seed: parse_env_opt!("RNG_SEED", u64),
        bind_port: parse_env!("BIND_PORT", u16, 8080),
    };

    config.validate()?;
    Ok(config)
}

impl Config {
    /// Reject configurations the pipeline cannot run under.
    fn validate(&self) -> Result<()> {
        // ---
        if self.cycle_length_secs == 0 {
            bail!("CYCLE_LENGTH_SECS must be at least 1");
        }
        if self.history_capacity == 0 {
            bail!("HISTORY_CAPACITY must be at least 1");
        }
        if self.grid_batch_size == 0 {
            bail!("GRID_BATCH_SIZE must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.severe_probability) {
            bail!(
                "SEVERE_REGIME_PROBABILITY must be within [0, 1], got {}",
                self.severe_probability
            );
        }
        Ok(())
    }

    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  CYCLE_LENGTH_SECS         : {}", self.cycle_length_secs);
        tracing::info!("  HISTORY_CAPACITY          : {}", self.history_capacity);
        tracing::info!("  GRID_BATCH_SIZE           : {}", self.grid_batch_size);
        tracing::info!("  SEVERE_REGIME_PROBABILITY : {}", self.severe_probability);
        tracing::info!("  ACQUISITION_LATENCY_MS    : {}", self.acquisition_latency_ms);
        tracing::info!(
            "  SITE                      : {}, {}",
            self.site_latitude,
            self.site_longitude
        );
        match self.rng_seed {
            Some(seed) => tracing::info!("  RNG_SEED                  : {}", seed),
            None => tracing::info!("  RNG_SEED                  : (entropy)"),
        }
        tracing::info!("  BIND_PORT                 : {}", self.bind_port);
    }
}
