//! Centralized advisory thresholds and travel tuning constants.
//!
//! These values define the deterministic cutoffs the rule registry and the
//! fare calculator read. Keeping them together ensures that advice can only be
//! adjusted via code changes reviewed in version control, or through an
//! explicit config file that overrides them field by field.

// Gold and cash bands -------------------------------------------------------
pub(crate) const GOLD_CRITICAL: f64 = 15.0;
pub(crate) const GOLD_SAFE: f64 = 40.0;
pub(crate) const CASH_POOR: f64 = 500.0;

// Wagon fill bands (percent) ------------------------------------------------
pub(crate) const WAGON_FULL_PCT: f64 = 90.0;
pub(crate) const WAGON_NEAR_FULL_PCT: f64 = 75.0;
pub(crate) const WAGON_EMPTY_PCT: f64 = 10.0;
pub(crate) const WAGON_LOAD_MAX_PCT: f64 = 100.0;

// Economy -------------------------------------------------------------------
pub(crate) const NATURALIST_UNLOCK_GOLD: f64 = 25.0;
pub(crate) const WAGON_SALE_VALUE: f64 = 625.0;

// Phase ranges (rank) -------------------------------------------------------
pub(crate) const PHASE_MID_START_RANK: u32 = 40;
pub(crate) const PHASE_LATE_START_RANK: u32 = 90;

// Player record defaults ----------------------------------------------------
pub(crate) const DEFAULT_RANK: u32 = 1;
pub(crate) const DEFAULT_CASH: f64 = 0.0;
pub(crate) const DEFAULT_GOLD: f64 = 0.0;
pub(crate) const DEFAULT_WAGON_LOAD: f64 = 0.0;

// Role keys -----------------------------------------------------------------
pub(crate) const ROLE_TRADER: &str = "trader";
pub(crate) const ROLE_BOUNTY: &str = "bounty";
pub(crate) const ROLE_COLLECTOR: &str = "collector";
pub(crate) const ROLE_NATURALIST: &str = "naturalist";

// Travel fares --------------------------------------------------------------
pub(crate) const FARE_DISTANCE_DIVISOR: f64 = 10.0;
pub(crate) const FARE_MIN: u32 = 1;
pub(crate) const FARE_MAX: u32 = 10;
pub(crate) const COMMIT_HOLD_MS: u64 = 3_000;

// Rule identifiers ----------------------------------------------------------
pub(crate) const RULE_DEFAULT_ID: &str = "daily_streak";
