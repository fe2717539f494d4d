// (c) Copyright 2026 The wayfind authors
// SPDX-License-Identifier: MIT

use crate::{graph::Network, straight_line_distance, Graph, Node};

/// KDTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree),
/// which can be used to speed up closest-node search for large networks.
/// [crate::Graph]'s closest-node lookup scans every node and quickly starts
/// dominating total planning time when many routes are generated over one
/// map. A k-d tree helps with that, trading memory usage for CPU time.
///
/// Exact distance ties are broken towards the lowest node id, matching the
/// determinism requirement of [Network::find_closest_node].
#[derive(Debug, Clone)]
pub struct KDTree {
    pivot: Node,
    left: Option<Box<KDTree>>,
    right: Option<Box<KDTree>>,
}

impl KDTree {
    /// Finds the closest [Node] to the given position.
    pub fn find_closest_node(&self, x: f32, y: f32) -> Node {
        self.find_closest_node_impl(x, y, false).0
    }

    fn find_closest_node_impl(&self, x: f32, y: f32, y_divides: bool) -> (Node, f32) {
        // Start by assuming that pivot is the closest
        let mut best = self.pivot;
        let mut best_dist = straight_line_distance(x, y, best.x, best.y);

        // Select which branch to recurse into first
        let first_left = if y_divides { y < best.y } else { x < best.x };
        let (first, second) = if first_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        // Recurse into the first branch
        if let Some(ref branch) = first {
            let (alt, alt_dist) = branch.find_closest_node_impl(x, y, !y_divides);
            if improves(&alt, alt_dist, &best, best_dist) {
                best = alt;
                best_dist = alt_dist;
            }
        }

        // (Optionally) recurse into the second branch
        if let Some(ref branch) = second {
            // A closer node is possible in the second branch if and only if
            // the splitting axis is no further than the current best candidate.
            let dist_to_axis = if y_divides {
                (y - self.pivot.y).abs()
            } else {
                (x - self.pivot.x).abs()
            };

            if dist_to_axis <= best_dist {
                let (alt, alt_dist) = branch.find_closest_node_impl(x, y, !y_divides);
                if improves(&alt, alt_dist, &best, best_dist) {
                    best = alt;
                    best_dist = alt_dist;
                }
            }
        }

        (best, best_dist)
    }

    /// Builds a k-d tree from an iterable of [Nodes](Node).
    /// Returns [None] for an empty iterable.
    pub fn from_iter<I: IntoIterator<Item = Node>>(nodes: I) -> Option<Self> {
        let mut nodes = nodes.into_iter().collect::<Vec<_>>();
        Self::build(nodes.as_mut_slice())
    }

    /// Builds a k-d tree from a mutable slice of [Nodes](Node). Nodes will
    /// be reordered in the slice to facilitate building the tree.
    pub fn build(nodes: &mut [Node]) -> Option<Self> {
        Self::build_impl(nodes, false)
    }

    fn build_impl(nodes: &mut [Node], y_divides: bool) -> Option<Self> {
        match nodes.len() {
            0 => None,
            1 => Some(Self {
                pivot: nodes[0],
                left: None,
                right: None,
            }),
            _ => {
                if y_divides {
                    nodes.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap().then(a.id.cmp(&b.id)));
                } else {
                    nodes.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap().then(a.id.cmp(&b.id)));
                }
                let median = nodes.len() / 2;
                let pivot = nodes[median];
                let (left, right_and_pivot) = nodes.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(Self {
                    pivot,
                    left: box_option(Self::build_impl(left, !y_divides)),
                    right: box_option(Self::build_impl(right, !y_divides)),
                })
            }
        }
    }
}

fn improves(alt: &Node, alt_dist: f32, best: &Node, best_dist: f32) -> bool {
    alt_dist < best_dist || (alt_dist == best_dist && alt.id < best.id)
}

#[inline]
fn box_option<T>(o: Option<T>) -> Option<Box<T>> {
    o.map(|thing| Box::new(thing))
}

/// Pairs a [Graph] with a [KDTree] index over its nodes, speeding up
/// closest-node lookups on large networks. All other [Network] queries
/// delegate to the underlying graph.
///
/// The index is a snapshot: nodes added to or moved within the graph after
/// construction are not reflected in lookups.
#[derive(Debug, Clone)]
pub struct IndexedGraph<'a> {
    graph: &'a Graph,
    index: Option<KDTree>,
}

impl<'a> IndexedGraph<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            index: KDTree::from_iter(graph.iter().copied()),
        }
    }
}

impl Network for IndexedGraph<'_> {
    fn find_closest_node(&self, x: f32, y: f32) -> Option<Node> {
        self.index.as_ref().map(|tree| tree.find_closest_node(x, y))
    }

    fn get_node(&self, id: i64) -> Option<Node> {
        self.graph.get_node(id)
    }

    fn neighbors_of(&self, id: i64) -> &[i64] {
        self.graph.neighbors_of(id)
    }

    fn distance(&self, a: &Node, b: &Node) -> f32 {
        self.graph.distance(a, b)
    }

    fn metric_scale(&self) -> f32 {
        Network::metric_scale(self.graph)
    }
}
