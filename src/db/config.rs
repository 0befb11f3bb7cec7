//! Store configuration and environment variable handling.

use std::env;

use crate::models::POINT_ACCURACY_M;

/// Tuning knobs for the reporting pipeline, loaded from the environment.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Radius in meters within which a new report merges into an existing
    /// location.
    pub proximity_m: f64,
    /// Optional number of decimal places to round incoming coordinates to
    /// before the proximity lookup. `None` stores coordinates as reported.
    pub round_decimals: Option<u32>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            proximity_m: POINT_ACCURACY_M,
            round_decimals: None,
        }
    }
}

impl StoreConfig {
    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `WHEREABOUTS_PROXIMITY_M` (optional, default: 10): merge radius in meters
    /// - `WHEREABOUTS_ROUND_DECIMALS` (optional, default: unset): coordinate
    ///   rounding precision; 4 keeps a fix within roughly 11 meters
    ///
    /// # Errors
    /// Returns an error if a variable is set but does not parse.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("WHEREABOUTS_PROXIMITY_M") {
            config.proximity_m = raw
                .parse()
                .map_err(|_| "WHEREABOUTS_PROXIMITY_M must be a number of meters".to_string())?;
        }

        if let Ok(raw) = env::var("WHEREABOUTS_ROUND_DECIMALS") {
            config.round_decimals = Some(raw.parse().map_err(|_| {
                "WHEREABOUTS_ROUND_DECIMALS must be a number of decimal places".to_string()
            })?);
        }

        Ok(config)
    }
}
