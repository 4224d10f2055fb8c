//! Advisor and travel configuration loaded from JSON with per-field defaults.
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::constants::{COMMIT_HOLD_MS, FARE_DISTANCE_DIVISOR, FARE_MAX, FARE_MIN};
use crate::thresholds::Thresholds;

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("gold critical cutoff {critical:.2} exceeds gold safe cutoff {safe:.2}")]
    GoldBandInverted { critical: f64, safe: f64 },
    #[error("wagon bands out of order (empty {empty}, near full {near_full}, full {full})")]
    WagonBandsOutOfOrder {
        empty: f64,
        near_full: f64,
        full: f64,
    },
    #[error("phase ranges out of order (mid starts at {mid_start}, late at {late_start})")]
    PhaseRangesOutOfOrder { mid_start: u32, late_start: u32 },
    #[error("fare divisor must be positive and finite (got {value})")]
    FareDivisor { value: f64 },
    #[error("fare bounds invalid (min {min} > max {max}, or min below 1)")]
    FareBoundsInverted { min: u32, max: u32 },
}

/// Fare formula and commit timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelConfig {
    #[serde(default = "TravelConfig::default_fare_divisor")]
    pub fare_divisor: f64,
    #[serde(default = "TravelConfig::default_min_fare")]
    pub min_fare: u32,
    #[serde(default = "TravelConfig::default_max_fare")]
    pub max_fare: u32,
    /// How long a confirmed trip holds the selection before it lands.
    #[serde(default = "TravelConfig::default_commit_hold_ms")]
    pub commit_hold_ms: u64,
}

impl TravelConfig {
    const fn default_fare_divisor() -> f64 {
        FARE_DISTANCE_DIVISOR
    }

    const fn default_min_fare() -> u32 {
        FARE_MIN
    }

    const fn default_max_fare() -> u32 {
        FARE_MAX
    }

    const fn default_commit_hold_ms() -> u64 {
        COMMIT_HOLD_MS
    }

    #[must_use]
    pub const fn commit_hold(&self) -> Duration {
        Duration::from_millis(self.commit_hold_ms)
    }

    /// Check the fare formula inputs.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the divisor or fare bounds are unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fare_divisor.is_finite() || self.fare_divisor <= 0.0 {
            return Err(ConfigError::FareDivisor {
                value: self.fare_divisor,
            });
        }
        if self.min_fare == 0 || self.min_fare > self.max_fare {
            return Err(ConfigError::FareBoundsInverted {
                min: self.min_fare,
                max: self.max_fare,
            });
        }
        Ok(())
    }
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            fare_divisor: Self::default_fare_divisor(),
            min_fare: Self::default_min_fare(),
            max_fare: Self::default_max_fare(),
            commit_hold_ms: Self::default_commit_hold_ms(),
        }
    }
}

/// Full advisor configuration: rule thresholds plus travel tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub travel: TravelConfig,
}

impl AdvisorConfig {
    /// Parse a config document; missing sections fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate both sections.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        self.travel.validate()
    }
}
