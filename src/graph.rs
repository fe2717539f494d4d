// (c) Copyright 2026 The wayfind authors
// SPDX-License-Identifier: MIT

use crate::{straight_line_distance, Node};
use std::collections::btree_map::{BTreeMap, Entry};

/// Capabilities the route planner requires from a road network.
///
/// Implementations must be deterministic: [find_closest_node](Self::find_closest_node)
/// breaks exact distance ties towards the lowest node id, and
/// [neighbors_of](Self::neighbors_of) yields ids in a stable order. Which of
/// several equal-cost routes the planner returns follows directly from these
/// orders.
///
/// [distance](Self::distance) must be symmetric, non-negative, zero only
/// between a node and itself, and satisfy the triangle inequality. The
/// planner's straight-line heuristic is only admissible under these
/// conditions; a metric that understates the cost between adjacent nodes may
/// cause suboptimal routes, without an error being raised.
pub trait Network {
    /// Finds the node closest to the given position in native coordinates.
    /// Returns [None] only when the network holds no nodes.
    fn find_closest_node(&self, x: f32, y: f32) -> Option<Node>;

    /// Retrieves the [Node] with the provided id.
    fn get_node(&self, id: i64) -> Option<Node>;

    /// Ids of all nodes adjacent to the node with the given id.
    ///
    /// A returned id might not resolve through [get_node](Self::get_node);
    /// consumers must silently ignore such entries.
    fn neighbors_of(&self, id: i64) -> &[i64];

    /// Distance between two nodes, in native coordinate units.
    fn distance(&self, a: &Node, b: &Node) -> f32;

    /// Conversion factor from native coordinate units to real-world
    /// distance units (e.g. meters).
    fn metric_scale(&self) -> f32;
}

/// Represents a road network as a set of [Nodes](Node) and adjacency
/// between them, with a straight-line distance metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<i64, (Node, Vec<i64>)>,
    metric_scale: f32,
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            metric_scale: 1.0,
        }
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph,
    /// in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().map(|(_, (node, _))| node)
    }

    /// Creates or updates a [Node] with `node.id`.
    ///
    /// All adjacency is preserved. Moving a node changes the cost of
    /// every road through it and must not happen during an in-flight
    /// search.
    pub fn set_node(&mut self, node: Node) {
        match self.nodes.entry(node.id) {
            Entry::Vacant(e) => {
                e.insert((node, Vec::default()));
            }
            Entry::Occupied(mut e) => {
                debug_assert_eq!(e.get().0.id, node.id);
                e.get_mut().0 = node;
            }
        }
    }

    /// Deletes a [Node] with a given `id`.
    ///
    /// While the node's own adjacency is removed, entries pointing at it
    /// from other nodes are preserved (removing them would require a walk
    /// over the whole graph). [Network::neighbors_of] consumers skip such
    /// dangling ids.
    pub fn delete_node(&mut self, id: i64) {
        self.nodes.remove(&id);
    }

    /// Creates a one-way connection from one node to another. Does nothing
    /// if `from_id` is unknown or the connection already exists.
    pub fn add_edge(&mut self, from_id: i64, to_id: i64) {
        if let Some((_, neighbors)) = self.nodes.get_mut(&from_id) {
            if !neighbors.contains(&to_id) {
                neighbors.push(to_id);
            }
        }
    }

    /// Connects two nodes in both directions.
    pub fn link(&mut self, a_id: i64, b_id: i64) {
        self.add_edge(a_id, b_id);
        self.add_edge(b_id, a_id);
    }

    /// Removes the connection from one node to another.
    pub fn delete_edge(&mut self, from_id: i64, to_id: i64) {
        if let Some((_, neighbors)) = self.nodes.get_mut(&from_id) {
            if let Some(idx) = neighbors.iter().position(|&id| id == to_id) {
                neighbors.remove(idx);
            }
        }
    }

    /// Checks whether a connection from one node to another exists.
    pub fn has_edge(&self, from_id: i64, to_id: i64) -> bool {
        self.neighbors(from_id).contains(&to_id)
    }

    fn neighbors(&self, id: i64) -> &[i64] {
        self.nodes
            .get(&id)
            .map(|(_, n)| n.as_slice())
            .unwrap_or_default()
    }

    /// Sets the conversion factor from native coordinate units to
    /// real-world distance units. Defaults to 1.0.
    pub fn set_metric_scale(&mut self, scale: f32) {
        self.metric_scale = scale;
    }
}

impl Network for Graph {
    /// Finds the closest [Node] to the given position, breaking exact
    /// distance ties towards the lowest id.
    ///
    /// This function computes the distance to every [Node] in the graph;
    /// for large graphs, use an [IndexedGraph](crate::IndexedGraph).
    fn find_closest_node(&self, x: f32, y: f32) -> Option<Node> {
        self.nodes
            .values()
            .map(|(nd, _)| (straight_line_distance(x, y, nd.x, nd.y), nd))
            .min_by(|(a_dist, a), (b_dist, b)| {
                a_dist.partial_cmp(b_dist).unwrap().then(a.id.cmp(&b.id))
            })
            .map(|(_, nd)| *nd)
    }

    fn get_node(&self, id: i64) -> Option<Node> {
        self.nodes.get(&id).map(|&(node, _)| node)
    }

    /// Adjacent node ids, in the order their connections were added.
    fn neighbors_of(&self, id: i64) -> &[i64] {
        self.neighbors(id)
    }

    fn distance(&self, a: &Node, b: &Node) -> f32 {
        straight_line_distance(a.x, a.y, b.x, b.y)
    }

    fn metric_scale(&self) -> f32 {
        self.metric_scale
    }
}
