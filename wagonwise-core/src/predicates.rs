//! Derived boolean signals over player and wagon state.
//!
//! Rules never read raw fields; they go through these functions so every
//! cutoff lives in [`Thresholds`].
use crate::state::{PlayerState, WagonState};
use crate::thresholds::Thresholds;

#[must_use]
pub fn has_trader(state: &PlayerState) -> bool {
    state.trader_xp() > 0.0
}

#[must_use]
pub fn has_bounty(state: &PlayerState) -> bool {
    state.bounty_xp() > 0.0
}

#[must_use]
pub fn has_collector(state: &PlayerState) -> bool {
    state.collector_xp() > 0.0
}

#[must_use]
pub fn has_naturalist(state: &PlayerState) -> bool {
    state.naturalist_xp() > 0.0
}

#[must_use]
pub fn is_gold_critical(state: &PlayerState, thresholds: &Thresholds) -> bool {
    state.gold < thresholds.gold_critical
}

#[must_use]
pub fn is_gold_safe(state: &PlayerState, thresholds: &Thresholds) -> bool {
    state.gold >= thresholds.gold_safe
}

#[must_use]
pub fn can_afford_naturalist(state: &PlayerState, thresholds: &Thresholds) -> bool {
    state.gold >= thresholds.naturalist_unlock_gold
}

#[must_use]
pub fn is_cash_poor(state: &PlayerState, thresholds: &Thresholds) -> bool {
    state.cash < thresholds.cash_poor
}

#[must_use]
pub fn is_before_mid_phase(state: &PlayerState, thresholds: &Thresholds) -> bool {
    state.rank < thresholds.phases.mid_start
}

#[must_use]
pub fn is_wagon_full(wagon: &WagonState, thresholds: &Thresholds) -> bool {
    wagon.load >= thresholds.wagon_full
}

#[must_use]
pub fn is_wagon_near_full(wagon: &WagonState, thresholds: &Thresholds) -> bool {
    wagon.load >= thresholds.wagon_near_full
}

#[must_use]
pub fn is_wagon_empty(wagon: &WagonState, thresholds: &Thresholds) -> bool {
    wagon.load < thresholds.wagon_empty
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn player(gold: f64, cash: f64) -> PlayerState {
        PlayerState {
            rank: 10,
            cash,
            gold,
            roles: BTreeMap::new(),
        }
    }

    #[test]
    fn gold_bands_use_strict_and_inclusive_edges() {
        let t = Thresholds::default();
        assert!(is_gold_critical(&player(14.99, 0.0), &t));
        assert!(!is_gold_critical(&player(15.0, 0.0), &t));
        assert!(!is_gold_safe(&player(39.9, 0.0), &t));
        assert!(is_gold_safe(&player(40.0, 0.0), &t));
        assert!(can_afford_naturalist(&player(25.0, 0.0), &t));
        assert!(!can_afford_naturalist(&player(24.9, 0.0), &t));
    }

    #[test]
    fn cash_poor_is_strictly_below_cutoff() {
        let t = Thresholds::default();
        assert!(is_cash_poor(&player(0.0, 499.0), &t));
        assert!(!is_cash_poor(&player(0.0, 500.0), &t));
    }

    #[test]
    fn wagon_bands_match_table() {
        let t = Thresholds::default();
        assert!(is_wagon_full(&WagonState::new(90.0), &t));
        assert!(!is_wagon_full(&WagonState::new(89.9), &t));
        assert!(is_wagon_near_full(&WagonState::new(75.0), &t));
        assert!(is_wagon_near_full(&WagonState::new(95.0), &t));
        assert!(!is_wagon_near_full(&WagonState::new(74.0), &t));
        assert!(is_wagon_empty(&WagonState::new(9.9), &t));
        assert!(!is_wagon_empty(&WagonState::new(10.0), &t));
    }

    #[test]
    fn roles_count_only_with_positive_experience() {
        let mut state = player(0.0, 0.0);
        state.roles.insert("trader".into(), 1.0);
        state.roles.insert("collector".into(), 0.0);
        assert!(has_trader(&state));
        assert!(!has_collector(&state));
        assert!(!has_bounty(&state));
        assert!(!has_naturalist(&state));
    }
}
