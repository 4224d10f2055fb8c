//! Wagonwise Advisory Engine
//!
//! Platform-agnostic core for the wagonwise companion tool: an ordered,
//! explainable rule engine that recommends a player's next economic action,
//! and a fast-travel planner (BFS routes, distance fares, and a selection
//! state machine with a timed commit). No rendering or storage lives here.

pub mod config;
pub mod constants;
pub mod engine;
pub mod fare;
pub mod graph;
pub mod numbers;
pub mod predicates;
pub mod recommendation;
pub mod rules;
pub mod selection;
pub mod state;
pub mod thresholds;
pub mod topology;

// Re-export commonly used types
pub use config::{AdvisorConfig, ConfigError, TravelConfig};
pub use engine::{
    Diagnostics, Explanation, InputSnapshot, RuleEvaluation, SkippedRule, analyze, analyze_with,
    explain, explain_at, explain_with,
};
pub use fare::{Coord, compute_travel_cost, compute_travel_cost_with};
pub use graph::{LocationGraph, NodeId, PathEdge, path_to_edges};
pub use recommendation::{
    Advice, Constraint, PrimaryAction, Priority, Recommendation, SecondaryAction,
};
pub use rules::{RULES, Rule, RuleContext, default_recommendation, rule_ids};
pub use selection::{ConfirmOutcome, PendingTravel, SelectionPhase, TravelError, TravelSelection};
pub use state::{PlayerState, WagonState, get_number};
pub use thresholds::{Phase, PhaseTable, Thresholds};
pub use topology::{LocationSpec, RouteMap, RouteQuote, Topology, TopologyError};

/// Config name passed to [`DataLoader::load_config`] for the advisor settings.
pub const ADVISOR_CONFIG_NAME: &str = "advisor";

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the travel node/edge table from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the topology cannot be loaded.
    fn load_topology(&self) -> Result<Topology, Self::Error>;

    /// Load configuration data for a specific system
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned;
}

/// Validated config and route map, built once and shared by reference.
#[derive(Debug, Clone)]
pub struct Advisor {
    config: AdvisorConfig,
    routes: RouteMap,
}

impl Advisor {
    /// Built-in thresholds and the frontier topology.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            config: AdvisorConfig::default(),
            routes: RouteMap::frontier(),
        }
    }

    /// Build from explicit parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or topology violates its invariants.
    pub fn new(config: AdvisorConfig, topology: &Topology) -> Result<Self, anyhow::Error> {
        config.validate()?;
        let routes = RouteMap::from_topology(topology, config.travel.clone())?;
        Ok(Self { config, routes })
    }

    /// Load config and topology through `loader`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the loaded data is invalid.
    pub fn load<L>(loader: &L) -> Result<Self, anyhow::Error>
    where
        L: DataLoader,
    {
        let config: AdvisorConfig = loader.load_config(ADVISOR_CONFIG_NAME)?;
        let topology = loader.load_topology()?;
        Self::new(config, &topology)
    }

    #[must_use]
    pub const fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    #[must_use]
    pub const fn routes(&self) -> &RouteMap {
        &self.routes
    }

    #[must_use]
    pub fn analyze(&self, player: &PlayerState, wagon: &WagonState) -> Advice {
        analyze_with(&self.config.thresholds, player, wagon)
    }

    #[must_use]
    pub fn explain(&self, player: &PlayerState, wagon: &WagonState) -> Explanation {
        explain_with(&self.config.thresholds, player, wagon, chrono::Utc::now())
    }

    #[must_use]
    pub fn shortest_path(&self, origin: &str, destination: &str) -> Vec<NodeId> {
        self.routes.shortest_path(origin, destination)
    }

    #[must_use]
    pub fn quote(&self, origin: &str, destination: &str) -> Option<RouteQuote> {
        self.routes.quote(origin, destination)
    }

    /// Fresh travel selection bound to this advisor's route map.
    #[must_use]
    pub const fn selection(&self) -> TravelSelection<'_> {
        TravelSelection::new(&self.routes)
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl DataLoader for FixtureLoader {
        type Error = Infallible;

        fn load_topology(&self) -> Result<Topology, Self::Error> {
            Ok(Topology::frontier())
        }

        fn load_config<T>(&self, _config_name: &str) -> Result<T, Self::Error>
        where
            T: DeserializeOwned,
        {
            let parsed = serde_json::from_str(r#"{ "thresholds": { "cash_poor": 1000 } }"#)
                .unwrap();
            Ok(parsed)
        }
    }

    #[derive(Clone, Copy, Default)]
    struct BrokenLoader;

    impl DataLoader for BrokenLoader {
        type Error = std::io::Error;

        fn load_topology(&self) -> Result<Topology, Self::Error> {
            let mut topology = Topology::frontier();
            topology
                .edges
                .push(("valentine".to_string(), "atlantis".to_string()));
            Ok(topology)
        }

        fn load_config<T>(&self, _config_name: &str) -> Result<T, Self::Error>
        where
            T: DeserializeOwned,
        {
            serde_json::from_str("{}").map_err(std::io::Error::other)
        }
    }

    #[test]
    fn advisor_loads_config_through_loader() {
        let advisor = Advisor::load(&FixtureLoader).unwrap();
        assert!((advisor.config().thresholds.cash_poor - 1000.0).abs() < f64::EPSILON);

        let player = PlayerState {
            rank: 60,
            cash: 800.0,
            gold: 50.0,
            roles: [("collector".to_string(), 1.0), ("naturalist".to_string(), 1.0)]
                .into_iter()
                .collect(),
        };
        let advice = advisor.analyze(&player, &WagonState::empty());
        assert_eq!(advice.rule_id, "collector_full_route");
        assert_eq!(analyze(&player, &WagonState::empty()).rule_id, "daily_streak");
    }

    #[test]
    fn advisor_rejects_inconsistent_topology() {
        let err = Advisor::load(&BrokenLoader).unwrap_err();
        assert!(err.to_string().contains("atlantis"));
    }

    #[test]
    fn advisor_rejects_invalid_config() {
        let mut config = AdvisorConfig::default();
        config.travel.max_fare = 0;
        assert!(Advisor::new(config, &Topology::frontier()).is_err());
    }

    #[test]
    fn default_advisor_plans_routes() {
        let advisor = Advisor::default();
        let quote = advisor.quote("valentine", "saintdenis").unwrap();
        assert_eq!(quote.hops, 2);
        assert_eq!(quote.cost, 10);
        let mut selection = advisor.selection();
        assert_eq!(selection.pick("valentine"), Ok(SelectionPhase::OriginOnly));
    }
}
