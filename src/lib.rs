// (c) Copyright 2026 The wayfind authors
// SPDX-License-Identifier: MIT

//! A* route planning over 2D road networks.
//!
//! A road network is a set of [Nodes](Node) in a flat coordinate space,
//! connected by adjacency and exposed to the planner through the [Network]
//! trait. [RoutePlanner] resolves start and end positions (given in percent
//! of the map extent) to their closest nodes and runs A* to find the
//! shortest route between them, reporting its waypoints and real-world
//! length.
//!
//! # Example
//!
//! ```
//! let mut g = wayfind::Graph::new();
//! g.set_node(wayfind::Node { id: 1, x: 0.0, y: 0.0 });
//! g.set_node(wayfind::Node { id: 2, x: 1.0, y: 1.0 });
//! g.link(1, 2);
//!
//! let planner = wayfind::RoutePlanner::new(&g, (0.0, 0.0), (100.0, 100.0))
//!     .expect("positions must resolve to nodes");
//! let route = planner.plan().expect("a route must exist");
//!
//! println!("{} waypoints, {} long", route.waypoints.len(), route.length);
//! ```

mod distance;
mod graph;
mod kd;
mod planner;

pub use distance::straight_line_distance;
pub use graph::{Graph, Network};
pub use kd::{IndexedGraph, KDTree};
pub use planner::{PlanError, Route, RoutePlanner};

/// Represents a single point of a road [Network].
///
/// Positions are expressed in the network's native coordinate space,
/// typically the unit square covering the loaded map extent. Conversion
/// to real-world distance units happens through [Network::metric_scale].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: i64,
    pub x: f32,
    pub y: f32,
}
