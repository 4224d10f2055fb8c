//! Fast-travel fare from straight-line map distance.
//!
//! The fare ignores the graph route entirely: a trip costs the same whether
//! the highlighted path has one hop or five.
use serde::{Deserialize, Serialize};

use crate::config::TravelConfig;
use crate::numbers::ceil_f64_to_u32;

/// Map coordinate of a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// `clamp(ceil(distance / 10), 1, 10)` with the default travel config.
#[must_use]
pub fn compute_travel_cost(origin: Coord, destination: Coord) -> u32 {
    compute_travel_cost_with(&TravelConfig::default(), origin, destination)
}

/// Fare under a custom divisor and bounds. Non-finite distances cost the minimum fare.
#[must_use]
pub fn compute_travel_cost_with(cfg: &TravelConfig, origin: Coord, destination: Coord) -> u32 {
    let distance = origin.distance_to(destination);
    let raw = ceil_f64_to_u32(distance / cfg.fare_divisor);
    raw.clamp(cfg.min_fare, cfg.max_fare.max(cfg.min_fare))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fare_rounds_up_per_ten_units() {
        let origin = Coord::new(0.0, 0.0);
        assert_eq!(compute_travel_cost(origin, Coord::new(30.0, 40.0)), 5);
        assert_eq!(compute_travel_cost(origin, Coord::new(41.0, 0.0)), 5);
        assert_eq!(compute_travel_cost(origin, Coord::new(0.0, 40.0)), 4);
    }

    #[test]
    fn fare_is_clamped_to_bounds() {
        let origin = Coord::new(10.0, 10.0);
        assert_eq!(compute_travel_cost(origin, origin), 1);
        assert_eq!(compute_travel_cost(origin, Coord::new(160.0, 10.0)), 10);
        assert_eq!(compute_travel_cost(origin, Coord::new(5_000.0, -900.0)), 10);
    }

    #[test]
    fn non_finite_coordinates_cost_the_minimum() {
        let origin = Coord::new(0.0, 0.0);
        assert_eq!(compute_travel_cost(origin, Coord::new(f64::NAN, 3.0)), 1);
        assert_eq!(compute_travel_cost(origin, Coord::new(f64::INFINITY, 3.0)), 1);
    }

    #[test]
    fn custom_config_changes_divisor_and_cap() {
        let cfg = TravelConfig {
            fare_divisor: 5.0,
            min_fare: 2,
            max_fare: 20,
            ..TravelConfig::default()
        };
        let origin = Coord::new(0.0, 0.0);
        assert_eq!(compute_travel_cost_with(&cfg, origin, Coord::new(51.0, 0.0)), 11);
        assert_eq!(compute_travel_cost_with(&cfg, origin, origin), 2);
        assert_eq!(compute_travel_cost_with(&cfg, origin, Coord::new(500.0, 0.0)), 20);
    }
}
