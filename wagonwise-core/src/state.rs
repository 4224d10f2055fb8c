//! Player and wagon snapshots built from loosely-typed records.
//!
//! Upstream profiles arrive as arbitrary JSON: fields may be missing, stored
//! as strings, or hold garbage. Every reader here resolves to a finite number
//! or a documented default, so nothing downstream ever sees NaN.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::{
    DEFAULT_CASH, DEFAULT_GOLD, DEFAULT_RANK, DEFAULT_WAGON_LOAD, ROLE_BOUNTY, ROLE_COLLECTOR,
    ROLE_NATURALIST, ROLE_TRADER, WAGON_LOAD_MAX_PCT,
};
use crate::numbers::{finite_or, floor_f64_to_u32, u32_to_f64};

/// Resolve a dotted `path` through nested objects (and arrays by index) and
/// coerce the leaf to a finite number, returning `fallback` otherwise.
#[must_use]
pub fn get_number(record: &Value, path: &str, fallback: f64) -> f64 {
    let mut cursor = record;
    for segment in path.split('.').filter(|segment| !segment.is_empty()) {
        let next = match cursor {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            _ => None,
        };
        match next {
            Some(value) => cursor = value,
            None => return fallback,
        }
    }
    coerce_number(cursor).unwrap_or(fallback)
}

fn coerce_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Economic snapshot of a player. Supplied fresh for every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    #[serde(default = "PlayerState::default_rank")]
    pub rank: u32,
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub gold: f64,
    /// Role name to accumulated experience; a role is owned when its value is positive.
    #[serde(default)]
    pub roles: BTreeMap<String, f64>,
}

impl PlayerState {
    const fn default_rank() -> u32 {
        DEFAULT_RANK
    }

    /// Build a sanitized snapshot from a loose profile record.
    #[must_use]
    pub fn from_record(record: &Value) -> Self {
        let rank = floor_f64_to_u32(get_number(record, "rank", u32_to_f64(DEFAULT_RANK)))
            .max(DEFAULT_RANK);
        let roles = record
            .get("roles")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .map(|(name, value)| {
                        let xp = coerce_number(value).unwrap_or(0.0).max(0.0);
                        (name.clone(), xp)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            rank,
            cash: get_number(record, "cash", DEFAULT_CASH).max(0.0),
            gold: get_number(record, "gold", DEFAULT_GOLD).max(0.0),
            roles,
        }
    }

    /// Re-apply the record invariants to a typed snapshot (for callers that
    /// deserialized or built the struct directly).
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.rank = self.rank.max(DEFAULT_RANK);
        self.cash = finite_or(self.cash, DEFAULT_CASH).max(0.0);
        self.gold = finite_or(self.gold, DEFAULT_GOLD).max(0.0);
        for xp in self.roles.values_mut() {
            *xp = finite_or(*xp, 0.0).max(0.0);
        }
        self
    }

    /// Experience for a role, defaulting to zero when absent.
    #[must_use]
    pub fn role_xp(&self, role: &str) -> f64 {
        self.roles
            .get(role)
            .copied()
            .map_or(0.0, |xp| finite_or(xp, 0.0))
    }

    #[must_use]
    pub fn owns_role(&self, role: &str) -> bool {
        self.role_xp(role) > 0.0
    }

    #[must_use]
    pub fn trader_xp(&self) -> f64 {
        self.role_xp(ROLE_TRADER)
    }

    #[must_use]
    pub fn bounty_xp(&self) -> f64 {
        self.role_xp(ROLE_BOUNTY)
    }

    #[must_use]
    pub fn collector_xp(&self) -> f64 {
        self.role_xp(ROLE_COLLECTOR)
    }

    #[must_use]
    pub fn naturalist_xp(&self) -> f64 {
        self.role_xp(ROLE_NATURALIST)
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            rank: DEFAULT_RANK,
            cash: DEFAULT_CASH,
            gold: DEFAULT_GOLD,
            roles: BTreeMap::new(),
        }
    }
}

/// Trader wagon fill level in percent, sourced separately from the profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WagonState {
    #[serde(default)]
    pub load: f64,
}

impl WagonState {
    /// Clamp a raw percentage into `[0, 100]`.
    #[must_use]
    pub fn new(load: f64) -> Self {
        Self {
            load: finite_or(load, DEFAULT_WAGON_LOAD).clamp(0.0, WAGON_LOAD_MAX_PCT),
        }
    }

    /// Accepts `{ "load": n }` or a bare number.
    #[must_use]
    pub fn from_record(record: &Value) -> Self {
        let load = coerce_number(record)
            .unwrap_or_else(|| get_number(record, "load", DEFAULT_WAGON_LOAD));
        Self::new(load)
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            load: DEFAULT_WAGON_LOAD,
        }
    }
}

impl Default for WagonState {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_number_walks_dotted_paths() {
        let record = json!({ "roles": { "trader": 12000 }, "stats": [ { "gold": "9.5" } ] });
        assert!((get_number(&record, "roles.trader", 0.0) - 12000.0).abs() < f64::EPSILON);
        assert!((get_number(&record, "stats.0.gold", 0.0) - 9.5).abs() < f64::EPSILON);
    }

    #[test]
    fn get_number_falls_back_on_missing_or_garbage() {
        let record = json!({ "cash": "lots", "gold": null, "rank": true, "nested": 4 });
        assert!((get_number(&record, "cash", 7.0) - 7.0).abs() < f64::EPSILON);
        assert!((get_number(&record, "gold", 1.0) - 1.0).abs() < f64::EPSILON);
        assert!((get_number(&record, "rank", 2.0) - 2.0).abs() < f64::EPSILON);
        assert!((get_number(&record, "nested.deeper", 3.0) - 3.0).abs() < f64::EPSILON);
        assert!((get_number(&record, "missing.path", 5.0) - 5.0).abs() < f64::EPSILON);
        assert!((get_number(&Value::Null, "anything", 6.0) - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn get_number_rejects_non_finite_strings() {
        let record = json!({ "cash": "NaN", "gold": "inf" });
        assert!((get_number(&record, "cash", 1.0) - 1.0).abs() < f64::EPSILON);
        assert!((get_number(&record, "gold", 2.0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn player_state_from_record_defaults_everything() {
        let state = PlayerState::from_record(&json!({}));
        assert_eq!(state, PlayerState::default());
        assert_eq!(state.rank, 1);

        let state = PlayerState::from_record(&json!("not an object"));
        assert_eq!(state, PlayerState::default());
    }

    #[test]
    fn player_state_from_record_sanitizes_fields() {
        let record = json!({
            "rank": "47.9",
            "cash": -20,
            "gold": "9.5",
            "roles": { "trader": 12000, "bounty": "oops", "collector": -5 }
        });
        let state = PlayerState::from_record(&record);
        assert_eq!(state.rank, 47);
        assert!(state.cash.abs() < f64::EPSILON);
        assert!((state.gold - 9.5).abs() < f64::EPSILON);
        assert!(state.owns_role("trader"));
        assert!(!state.owns_role("bounty"));
        assert!(!state.owns_role("collector"));
        assert!(!state.owns_role("naturalist"));
    }

    #[test]
    fn rank_zero_is_raised_to_one() {
        let state = PlayerState::from_record(&json!({ "rank": 0 }));
        assert_eq!(state.rank, 1);
    }

    #[test]
    fn sanitized_repairs_typed_snapshots() {
        let state = PlayerState {
            rank: 0,
            cash: f64::NAN,
            gold: -3.0,
            roles: BTreeMap::from([("trader".to_string(), f64::INFINITY)]),
        }
        .sanitized();
        assert_eq!(state.rank, 1);
        assert!(state.cash.abs() < f64::EPSILON);
        assert!(state.gold.abs() < f64::EPSILON);
        assert!(!state.owns_role("trader"));
    }

    #[test]
    fn wagon_accepts_object_or_bare_number_and_clamps() {
        let load = |record: serde_json::Value| WagonState::from_record(&record).load;
        assert!((load(json!({ "load": 95 })) - 95.0).abs() < f64::EPSILON);
        assert!((load(json!(42)) - 42.0).abs() < f64::EPSILON);
        assert!((load(json!({ "load": 180 })) - 100.0).abs() < f64::EPSILON);
        assert!(load(json!({ "load": "full" })).abs() < f64::EPSILON);
        assert!(WagonState::new(f64::NAN).load.abs() < f64::EPSILON);
    }
}
