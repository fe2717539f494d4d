// (c) Copyright 2026 The wayfind authors
// SPDX-License-Identifier: MIT

/// Error conditions which may occur when constructing a
/// [RoutePlanner](crate::RoutePlanner) or planning a route.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// A start or end position did not resolve to any node,
    /// which only happens when the network holds no nodes at all.
    ///
    /// Positions outside the loaded map region do resolve (to the closest
    /// border node) and are a caller error, not detected here.
    #[error("no node near ({0}, {1})")]
    InvalidCoordinates(f32, f32),

    /// The open set ran dry before the end node was reached:
    /// the end node is not reachable from the start node.
    #[error("no route from node {from} to node {to}")]
    NoPathFound { from: i64, to: i64 },
}
