//! Static undirected location graph with breadth-first shortest paths.
//!
//! The adjacency list is built once from an edge list and owned by the
//! caller; nothing here caches globally. Neighbor order follows edge-list
//! insertion order, which makes tie-breaking between equal-length routes
//! reproducible.
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Identifier of a travel node (e.g. `valentine`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One hop of a path, for highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEdge {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct LocationGraph {
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    /// Node ids in first-seen order.
    order: Vec<NodeId>,
}

impl LocationGraph {
    /// Build from an edge list, adding both directions per edge.
    #[must_use]
    pub fn from_edges<A, B>(edges: &[(A, B)]) -> Self
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        Self::from_parts(std::iter::empty::<&str>(), edges)
    }

    /// Build from explicit nodes (which may be isolated) plus an edge list.
    #[must_use]
    pub fn from_parts<N, A, B>(nodes: impl IntoIterator<Item = N>, edges: &[(A, B)]) -> Self
    where
        N: AsRef<str>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut graph = Self::default();
        for node in nodes {
            graph.ensure_node(node.as_ref());
        }
        for (a, b) in edges {
            let (a, b) = (a.as_ref(), b.as_ref());
            graph.ensure_node(a);
            graph.ensure_node(b);
            graph.link(a, b);
            graph.link(b, a);
        }
        graph
    }

    fn ensure_node(&mut self, id: &str) {
        if !self.adjacency.contains_key(id) {
            let node = NodeId::from(id);
            self.order.push(node.clone());
            self.adjacency.insert(node, Vec::new());
        }
    }

    fn link(&mut self, from: &str, to: &str) {
        if let Some(neighbors) = self.adjacency.get_mut(from) {
            if !neighbors.iter().any(|existing| existing == to) {
                neighbors.push(NodeId::from(to));
            }
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    #[must_use]
    pub fn neighbors(&self, id: &str) -> &[NodeId] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Node ids in first-seen order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Minimum-hop route from `start` to `end`.
    ///
    /// Returns `[start]` when both ends coincide and an empty path when
    /// either end is unknown (logged as a warning) or unreachable.
    #[must_use]
    pub fn find_shortest_path(&self, start: &str, end: &str) -> Vec<NodeId> {
        let (Some((start_id, _)), Some((end_id, _))) = (
            self.adjacency.get_key_value(start),
            self.adjacency.get_key_value(end),
        ) else {
            log::warn!("route requested for unknown location ({start} -> {end})");
            return Vec::new();
        };
        if start_id == end_id {
            return vec![start_id.clone()];
        }

        let mut visited: HashSet<&NodeId> = HashSet::from([start_id]);
        let mut previous: HashMap<&NodeId, &NodeId> = HashMap::new();
        let mut queue: VecDeque<&NodeId> = VecDeque::from([start_id]);

        while let Some(current) = queue.pop_front() {
            if current == end_id {
                return rebuild_path(&previous, start_id, end_id);
            }
            for next in self.neighbors(current.as_str()) {
                if visited.insert(next) {
                    previous.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
        Vec::new()
    }
}

fn rebuild_path<'a>(
    previous: &HashMap<&'a NodeId, &'a NodeId>,
    start: &NodeId,
    end: &'a NodeId,
) -> Vec<NodeId> {
    let mut path = vec![end.clone()];
    let mut cursor = end;
    while cursor != start {
        let Some(prior) = previous.get(cursor) else {
            return Vec::new();
        };
        path.push((*prior).clone());
        cursor = *prior;
    }
    path.reverse();
    path
}

/// Adjacent `(from, to)` pairs along `path`; empty for paths shorter than two.
#[must_use]
pub fn path_to_edges(path: &[NodeId]) -> Vec<PathEdge> {
    path.windows(2)
        .map(|pair| PathEdge {
            from: pair[0].clone(),
            to: pair[1].clone(),
        })
        .collect()
}
