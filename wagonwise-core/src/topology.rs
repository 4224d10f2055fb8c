//! Travel topology data and the validated route map built from it.
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::config::TravelConfig;
use crate::fare::{Coord, compute_travel_cost_with};
use crate::graph::{LocationGraph, NodeId, PathEdge, path_to_edges};

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("location {0} is declared more than once")]
    DuplicateLocation(String),
    #[error("edge {from} - {to} references undeclared location {missing}")]
    UndeclaredEndpoint {
        from: String,
        to: String,
        missing: String,
    },
    #[error("edge {0} - {0} loops back onto itself")]
    SelfLoop(String),
    #[error("failed to parse topology: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A named travel node with map coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSpec {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// Raw node and edge tables as shipped in data files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Topology {
    pub locations: Vec<LocationSpec>,
    pub edges: Vec<(String, String)>,
}

const FRONTIER_LOCATIONS: &[(&str, &str, f64, f64)] = &[
    ("tumbleweed", "Tumbleweed", 10.0, 150.0),
    ("armadillo", "Armadillo", 40.0, 140.0),
    ("macfarlanes_ranch", "MacFarlane's Ranch", 60.0, 115.0),
    ("blackwater", "Blackwater", 110.0, 100.0),
    ("thieves_landing", "Thieves' Landing", 140.0, 105.0),
    ("manzanita_post", "Manzanita Post", 95.0, 85.0),
    ("strawberry", "Strawberry", 80.0, 65.0),
    ("riggs_station", "Riggs Station", 115.0, 55.0),
    ("wallace_station", "Wallace Station", 130.0, 50.0),
    ("valentine", "Valentine", 150.0, 45.0),
    ("colter", "Colter", 130.0, 10.0),
    ("emerald_ranch", "Emerald Ranch", 190.0, 60.0),
    ("flatneck_station", "Flatneck Station", 195.0, 75.0),
    ("rhodes", "Rhodes", 200.0, 100.0),
    ("lagras", "Lagras", 215.0, 90.0),
    ("saintdenis", "Saint Denis", 250.0, 100.0),
    ("vanhorn", "Van Horn", 245.0, 55.0),
    ("annesburg", "Annesburg", 245.0, 35.0),
    ("guarma", "Guarma", 260.0, 190.0),
];

const FRONTIER_EDGES: &[(&str, &str)] = &[
    ("tumbleweed", "armadillo"),
    ("armadillo", "macfarlanes_ranch"),
    ("macfarlanes_ranch", "blackwater"),
    ("blackwater", "thieves_landing"),
    ("blackwater", "manzanita_post"),
    ("manzanita_post", "strawberry"),
    ("strawberry", "riggs_station"),
    ("riggs_station", "wallace_station"),
    ("wallace_station", "valentine"),
    ("valentine", "colter"),
    ("valentine", "emerald_ranch"),
    ("valentine", "vanhorn"),
    ("emerald_ranch", "flatneck_station"),
    ("flatneck_station", "rhodes"),
    ("emerald_ranch", "rhodes"),
    ("rhodes", "lagras"),
    ("rhodes", "saintdenis"),
    ("lagras", "saintdenis"),
    ("vanhorn", "annesburg"),
    ("vanhorn", "saintdenis"),
];

impl Topology {
    /// Built-in frontier map. `guarma` is an island with no overland edges.
    #[must_use]
    pub fn frontier() -> Self {
        Self {
            locations: FRONTIER_LOCATIONS
                .iter()
                .map(|&(id, name, x, y)| LocationSpec {
                    id: id.to_string(),
                    name: name.to_string(),
                    x,
                    y,
                })
                .collect(),
            edges: FRONTIER_EDGES
                .iter()
                .map(|&(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }

    /// Load a topology from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, TopologyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check that ids are unique and every edge joins two declared locations.
    ///
    /// # Errors
    ///
    /// Returns the first [`TopologyError`] found.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let mut seen = HashSet::new();
        for location in &self.locations {
            if !seen.insert(location.id.as_str()) {
                return Err(TopologyError::DuplicateLocation(location.id.clone()));
            }
        }
        for (from, to) in &self.edges {
            if from == to {
                return Err(TopologyError::SelfLoop(from.clone()));
            }
            for endpoint in [from, to] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(TopologyError::UndeclaredEndpoint {
                        from: from.clone(),
                        to: to.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Path, highlight edges, and fare for one origin/destination pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteQuote {
    pub origin: NodeId,
    pub destination: NodeId,
    pub path: Vec<NodeId>,
    pub edges: Vec<PathEdge>,
    pub hops: usize,
    pub cost: u32,
}

#[derive(Debug, Clone)]
struct Place {
    name: String,
    coord: Coord,
}

/// Location graph plus coordinates and fare settings, built once at startup.
#[derive(Debug, Clone)]
pub struct RouteMap {
    graph: LocationGraph,
    places: HashMap<NodeId, Place>,
    travel: TravelConfig,
}

impl RouteMap {
    /// Validate `topology` and build the graph.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if the topology is inconsistent.
    pub fn from_topology(topology: &Topology, travel: TravelConfig) -> Result<Self, TopologyError> {
        topology.validate()?;
        Ok(Self::build(topology, travel))
    }

    /// Built-in frontier map with default fares.
    #[must_use]
    pub fn frontier() -> Self {
        Self::build(&Topology::frontier(), TravelConfig::default())
    }

    fn build(topology: &Topology, travel: TravelConfig) -> Self {
        let graph = LocationGraph::from_parts(
            topology.locations.iter().map(|location| location.id.as_str()),
            &topology.edges,
        );
        let places = topology
            .locations
            .iter()
            .map(|location| {
                (
                    NodeId::new(location.id.clone()),
                    Place {
                        name: location.name.clone(),
                        coord: Coord::new(location.x, location.y),
                    },
                )
            })
            .collect();
        Self {
            graph,
            places,
            travel,
        }
    }

    #[must_use]
    pub const fn graph(&self) -> &LocationGraph {
        &self.graph
    }

    #[must_use]
    pub const fn travel_config(&self) -> &TravelConfig {
        &self.travel
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.places.contains_key(id)
    }

    #[must_use]
    pub fn coord(&self, id: &str) -> Option<Coord> {
        self.places.get(id).map(|place| place.coord)
    }

    /// Display name, falling back to the id itself.
    #[must_use]
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.places.get(id).map_or(id, |place| place.name.as_str())
    }

    /// Location ids in declaration order.
    #[must_use]
    pub fn locations(&self) -> &[NodeId] {
        self.graph.nodes()
    }

    #[must_use]
    pub fn neighbors(&self, id: &str) -> &[NodeId] {
        self.graph.neighbors(id)
    }

    #[must_use]
    pub fn shortest_path(&self, origin: &str, destination: &str) -> Vec<NodeId> {
        self.graph.find_shortest_path(origin, destination)
    }

    /// Fare between two known locations.
    #[must_use]
    pub fn fare_between(&self, origin: &str, destination: &str) -> Option<u32> {
        let from = self.coord(origin)?;
        let to = self.coord(destination)?;
        Some(compute_travel_cost_with(&self.travel, from, to))
    }

    /// Quote a trip; `None` if either location is unknown. A known but
    /// unreachable destination still gets a fare with an empty path.
    #[must_use]
    pub fn quote(&self, origin: &str, destination: &str) -> Option<RouteQuote> {
        let cost = self.fare_between(origin, destination)?;
        let path = self.shortest_path(origin, destination);
        let edges = path_to_edges(&path);
        Some(RouteQuote {
            origin: NodeId::from(origin),
            destination: NodeId::from(destination),
            hops: edges.len(),
            path,
            edges,
            cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontier_topology_is_consistent() {
        let topology = Topology::frontier();
        topology.validate().unwrap();
        let map = RouteMap::from_topology(&topology, TravelConfig::default()).unwrap();
        assert_eq!(map.locations().len(), 19);
        assert_eq!(map.graph().edge_count(), 20);
        assert!(map.neighbors("guarma").is_empty());
        assert_eq!(map.display_name("saintdenis"), "Saint Denis");
        assert_eq!(map.display_name("unknown"), "unknown");
    }

    #[test]
    fn validate_rejects_duplicates_and_dangling_edges() {
        let mut topology = Topology::frontier();
        topology.locations.push(topology.locations[0].clone());
        assert!(matches!(
            topology.validate(),
            Err(TopologyError::DuplicateLocation(id)) if id == "tumbleweed"
        ));

        let mut topology = Topology::frontier();
        topology
            .edges
            .push(("valentine".to_string(), "atlantis".to_string()));
        assert!(matches!(
            topology.validate(),
            Err(TopologyError::UndeclaredEndpoint { missing, .. }) if missing == "atlantis"
        ));

        let mut topology = Topology::frontier();
        topology
            .edges
            .push(("rhodes".to_string(), "rhodes".to_string()));
        assert!(matches!(topology.validate(), Err(TopologyError::SelfLoop(_))));
    }

    #[test]
    fn from_json_parses_pairs() {
        let json = r#"{
            "locations": [
                { "id": "a", "name": "Alpha", "x": 0, "y": 0 },
                { "id": "b", "name": "Bravo", "x": 30, "y": 40 }
            ],
            "edges": [["a", "b"]]
        }"#;
        let topology = Topology::from_json(json).unwrap();
        let map = RouteMap::from_topology(&topology, TravelConfig::default()).unwrap();
        let quote = map.quote("a", "b").unwrap();
        assert_eq!(quote.hops, 1);
        assert_eq!(quote.cost, 5);

        assert!(matches!(
            Topology::from_json("{ nope"),
            Err(TopologyError::Parse(_))
        ));
    }

    #[test]
    fn quote_combines_path_and_fare() {
        let map = RouteMap::frontier();
        let quote = map.quote("blackwater", "strawberry").unwrap();
        let ids: Vec<&str> = quote.path.iter().map(NodeId::as_str).collect();
        assert_eq!(ids, vec!["blackwater", "manzanita_post", "strawberry"]);
        assert_eq!(quote.hops, 2);
        // hypot(30, 35) = 46.1
        assert_eq!(quote.cost, 5);

        let island = map.quote("valentine", "guarma").unwrap();
        assert!(island.path.is_empty());
        assert_eq!(island.hops, 0);
        assert!(map.quote("valentine", "atlantis").is_none());
    }
}
