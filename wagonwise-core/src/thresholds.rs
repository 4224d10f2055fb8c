//! Threshold and phase table consulted by the state predicates.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ConfigError;
use crate::constants::{
    CASH_POOR, GOLD_CRITICAL, GOLD_SAFE, NATURALIST_UNLOCK_GOLD, PHASE_LATE_START_RANK,
    PHASE_MID_START_RANK, WAGON_EMPTY_PCT, WAGON_FULL_PCT, WAGON_LOAD_MAX_PCT,
    WAGON_NEAR_FULL_PCT, WAGON_SALE_VALUE,
};

/// Coarse progression stage derived from player rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Early,
    Mid,
    Late,
}

impl Phase {
    /// Phase for `rank` using the default phase ranges.
    #[must_use]
    pub const fn for_rank(rank: u32) -> Self {
        Self::for_rank_with(&PhaseTable::DEFAULT, rank)
    }

    /// Phase for `rank` using a custom table. Ranges are half-open, so every
    /// rank maps to exactly one phase.
    #[must_use]
    pub const fn for_rank_with(table: &PhaseTable, rank: u32) -> Self {
        if rank < table.mid_start {
            Self::Early
        } else if rank < table.late_start {
            Self::Mid
        } else {
            Self::Late
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Early => "Early",
            Self::Mid => "Mid",
            Self::Late => "Late",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rank cutoffs: Early `[0, mid_start)`, Mid `[mid_start, late_start)`, Late `[late_start, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTable {
    #[serde(default = "PhaseTable::default_mid_start")]
    pub mid_start: u32,
    #[serde(default = "PhaseTable::default_late_start")]
    pub late_start: u32,
}

impl PhaseTable {
    pub const DEFAULT: Self = Self {
        mid_start: PHASE_MID_START_RANK,
        late_start: PHASE_LATE_START_RANK,
    };

    const fn default_mid_start() -> u32 {
        PHASE_MID_START_RANK
    }

    const fn default_late_start() -> u32 {
        PHASE_LATE_START_RANK
    }
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Numeric cutoffs read by every derived predicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Gold strictly below this forces gold-earning actions.
    #[serde(default = "Thresholds::default_gold_critical")]
    pub gold_critical: f64,
    /// Gold at or above this allows unconstrained gold spend.
    #[serde(default = "Thresholds::default_gold_safe")]
    pub gold_safe: f64,
    /// Cash strictly below this forces cash-earning actions.
    #[serde(default = "Thresholds::default_cash_poor")]
    pub cash_poor: f64,
    #[serde(default = "Thresholds::default_wagon_full")]
    pub wagon_full: f64,
    #[serde(default = "Thresholds::default_wagon_near_full")]
    pub wagon_near_full: f64,
    #[serde(default = "Thresholds::default_wagon_empty")]
    pub wagon_empty: f64,
    #[serde(default = "Thresholds::default_naturalist_unlock_gold")]
    pub naturalist_unlock_gold: f64,
    /// Cash paid out for a completely full trader wagon.
    #[serde(default = "Thresholds::default_wagon_sale_value")]
    pub wagon_sale_value: f64,
    #[serde(default)]
    pub phases: PhaseTable,
}

impl Thresholds {
    pub const DEFAULT: Self = Self {
        gold_critical: GOLD_CRITICAL,
        gold_safe: GOLD_SAFE,
        cash_poor: CASH_POOR,
        wagon_full: WAGON_FULL_PCT,
        wagon_near_full: WAGON_NEAR_FULL_PCT,
        wagon_empty: WAGON_EMPTY_PCT,
        naturalist_unlock_gold: NATURALIST_UNLOCK_GOLD,
        wagon_sale_value: WAGON_SALE_VALUE,
        phases: PhaseTable::DEFAULT,
    };

    const fn default_gold_critical() -> f64 {
        GOLD_CRITICAL
    }

    const fn default_gold_safe() -> f64 {
        GOLD_SAFE
    }

    const fn default_cash_poor() -> f64 {
        CASH_POOR
    }

    const fn default_wagon_full() -> f64 {
        WAGON_FULL_PCT
    }

    const fn default_wagon_near_full() -> f64 {
        WAGON_NEAR_FULL_PCT
    }

    const fn default_wagon_empty() -> f64 {
        WAGON_EMPTY_PCT
    }

    const fn default_naturalist_unlock_gold() -> f64 {
        NATURALIST_UNLOCK_GOLD
    }

    const fn default_wagon_sale_value() -> f64 {
        WAGON_SALE_VALUE
    }

    /// Check ordering invariants between the bands.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("gold_critical", self.gold_critical),
            ("gold_safe", self.gold_safe),
            ("cash_poor", self.cash_poor),
            ("wagon_full", self.wagon_full),
            ("wagon_near_full", self.wagon_near_full),
            ("wagon_empty", self.wagon_empty),
            ("naturalist_unlock_gold", self.naturalist_unlock_gold),
            ("wagon_sale_value", self.wagon_sale_value),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if self.gold_critical > self.gold_safe {
            return Err(ConfigError::GoldBandInverted {
                critical: self.gold_critical,
                safe: self.gold_safe,
            });
        }
        if !(self.wagon_empty < self.wagon_near_full
            && self.wagon_near_full <= self.wagon_full
            && self.wagon_full <= WAGON_LOAD_MAX_PCT)
        {
            return Err(ConfigError::WagonBandsOutOfOrder {
                empty: self.wagon_empty,
                near_full: self.wagon_near_full,
                full: self.wagon_full,
            });
        }
        if self.phases.mid_start >= self.phases.late_start {
            return Err(ConfigError::PhaseRangesOutOfOrder {
                mid_start: self.phases.mid_start,
                late_start: self.phases.late_start,
            });
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}
