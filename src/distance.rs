// (c) Copyright 2026 The wayfind authors
// SPDX-License-Identifier: MIT

/// Calculates the straight-line (euclidean) distance between two positions
/// in a network's native coordinate space.
pub fn straight_line_distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = (x2 - x1) as f64;
    let dy = (y2 - y1) as f64;
    (dx * dx + dy * dy).sqrt() as f32
}
