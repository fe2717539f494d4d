// (c) Copyright 2026 The wayfind authors
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap};

use crate::{graph::Network, Node, PlanError};

/// Divides percent-of-map-extent inputs down to the native unit space.
const PERCENT_SCALE: f32 = 0.01;

/// A computed route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Node snapshots along the route. The first element is the resolved
    /// start node, the last the resolved end node, and every consecutive
    /// pair is adjacent in the network.
    pub waypoints: Vec<Node>,

    /// Total length of the route, in real-world units
    /// (native length times [Network::metric_scale]).
    pub length: f32,
}

/// Plans shortest routes over a [Network] using the
/// [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm).
///
/// The planner resolves its start and end positions once, at construction
/// time. Every call to [plan](Self::plan) then runs a fresh search; all
/// search bookkeeping lives in a per-invocation session, never on the
/// network itself, so independent planners may search one network
/// concurrently.
#[derive(Debug)]
pub struct RoutePlanner<'a, N: Network> {
    network: &'a N,
    start: Node,
    end: Node,
}

impl<'a, N: Network> RoutePlanner<'a, N> {
    /// Creates a planner for a route between two `(x, y)` positions given
    /// in percent (0-100) of the map extent.
    ///
    /// Both positions are resolved to their closest nodes immediately;
    /// an empty network fails with [PlanError::InvalidCoordinates].
    /// Out-of-range positions are a caller error: they are not validated
    /// nor clamped here, and simply resolve to the closest node.
    pub fn new(network: &'a N, start: (f32, f32), end: (f32, f32)) -> Result<Self, PlanError> {
        let start_node = network
            .find_closest_node(start.0 * PERCENT_SCALE, start.1 * PERCENT_SCALE)
            .ok_or(PlanError::InvalidCoordinates(start.0, start.1))?;
        let end_node = network
            .find_closest_node(end.0 * PERCENT_SCALE, end.1 * PERCENT_SCALE)
            .ok_or(PlanError::InvalidCoordinates(end.0, end.1))?;

        log::debug!(
            "resolved start to node {}, end to node {}",
            start_node.id,
            end_node.id
        );

        Ok(Self {
            network,
            start: start_node,
            end: end_node,
        })
    }

    /// The node the start position resolved to.
    pub fn start_node(&self) -> Node {
        self.start
    }

    /// The node the end position resolved to.
    pub fn end_node(&self) -> Node {
        self.end
    }

    /// Runs the A* search and reconstructs the shortest route.
    ///
    /// Returns [PlanError::NoPathFound] if the end node is not reachable
    /// from the start node. Each node is admitted to the open set at most
    /// once, so the search always terminates.
    pub fn plan(&self) -> Result<Route, PlanError> {
        let mut session = Session::new(self.network, self.end);
        session.admit(self.start, None, 0.0);

        while let Some(OpenItem { record, .. }) = session.open.pop() {
            if session.records[record].node.id == self.end.id {
                log::debug!(
                    "reached node {} after admitting {} nodes",
                    self.end.id,
                    session.records.len()
                );
                return Ok(session.final_route(record));
            }
            session.expand(record);
        }

        Err(PlanError::NoPathFound {
            from: self.start.id,
            to: self.end.id,
        })
    }
}

/// Search bookkeeping for one node, held in the session's arena.
#[derive(Debug, Clone, Copy)]
struct SearchRecord {
    node: Node,

    /// Known cost from the start node, in native units.
    g: f32,

    /// Straight-line estimate of the remaining cost to the end node,
    /// in native units.
    h: f32,

    /// Arena index of the predecessor on the best-known path.
    /// [None] for the start node.
    parent: Option<usize>,
}

/// Entry of the open set, pointing into the session's record arena.
#[derive(Debug, Clone, Copy)]
struct OpenItem {
    record: usize,
    score: f32,
}

impl PartialEq for OpenItem {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.record == other.record
    }
}

impl Eq for OpenItem {}

impl Ord for OpenItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison, as lower scores are
        // considered better ("higher"), and Rust's BinaryHeap is a max-heap.
        // Scores are sums of distances and thus never NaN.
        // Records are allocated in admission order, so the secondary key
        // hands ties to the first-admitted node.
        other
            .score
            .partial_cmp(&self.score)
            .unwrap()
            .then(other.record.cmp(&self.record))
    }
}

impl PartialOrd for OpenItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// State of a single search, discarded once the route is produced.
struct Session<'a, N: Network> {
    network: &'a N,
    end: Node,
    records: Vec<SearchRecord>,
    visited: HashMap<i64, usize>,
    open: BinaryHeap<OpenItem>,
}

impl<'a, N: Network> Session<'a, N> {
    fn new(network: &'a N, end: Node) -> Self {
        Self {
            network,
            end,
            records: Vec::new(),
            visited: HashMap::new(),
            open: BinaryHeap::new(),
        }
    }

    /// Admits a newly-discovered node to the open set, recording its costs
    /// and predecessor.
    fn admit(&mut self, node: Node, parent: Option<usize>, g: f32) {
        let record = self.records.len();
        let h = self.network.distance(&node, &self.end);
        self.records.push(SearchRecord { node, g, h, parent });
        self.visited.insert(node.id, record);

        let stored = &self.records[record];
        self.open.push(OpenItem {
            record,
            score: stored.g + stored.h,
        });
    }

    /// Discovers the neighbors of a record's node and admits every one not
    /// seen before. A neighbor admitted earlier keeps its original costs and
    /// predecessor, even if this expansion reaches it cheaper.
    fn expand(&mut self, record: usize) {
        let network = self.network;
        let SearchRecord {
            node: current, g, ..
        } = self.records[record];

        for &neighbor_id in network.neighbors_of(current.id) {
            if self.visited.contains_key(&neighbor_id) {
                continue;
            }

            // Adjacency may refer to a deleted node; skip such entries
            if let Some(neighbor) = network.get_node(neighbor_id) {
                let neighbor_g = g + network.distance(&current, &neighbor);
                self.admit(neighbor, Some(record), neighbor_g);
            }
        }
    }

    /// Walks predecessor links back from the end record, producing
    /// waypoints in start-to-end order along with the route's
    /// real-world length.
    fn final_route(&self, record: usize) -> Route {
        let mut length = 0.0_f32;
        let mut waypoints = Vec::new();

        let mut current = &self.records[record];
        loop {
            waypoints.push(current.node);
            match current.parent {
                Some(parent) => {
                    let parent = &self.records[parent];
                    length += self.network.distance(&current.node, &parent.node);
                    current = parent;
                }
                None => break,
            }
        }
        waypoints.reverse();

        Route {
            waypoints,
            length: length * self.network.metric_scale(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Graph, IndexedGraph};

    fn node(id: i64, x: f32, y: f32) -> Node {
        Node { id, x, y }
    }

    fn ids(route: &Route) -> Vec<i64> {
        route.waypoints.iter().map(|n| n.id).collect()
    }

    fn assert_continuous(g: &Graph, route: &Route) {
        for pair in route.waypoints.windows(2) {
            assert!(
                g.has_edge(pair[0].id, pair[1].id),
                "no edge between consecutive waypoints {} and {}",
                pair[0].id,
                pair[1].id
            );
        }
    }

    /// Unit square with nodes at its corners, edges along the sides
    /// and one diagonal from corner 1 to corner 3:
    ///
    /// ```text
    /// (0,1) 4───3 (1,1)
    ///       │ ╱ │
    /// (0,0) 1───2 (1,0)
    /// ```
    fn square_graph() -> Graph {
        let mut g = Graph::new();
        g.set_node(node(1, 0.0, 0.0));
        g.set_node(node(2, 1.0, 0.0));
        g.set_node(node(3, 1.0, 1.0));
        g.set_node(node(4, 0.0, 1.0));
        g.link(1, 2);
        g.link(2, 3);
        g.link(3, 4);
        g.link(4, 1);
        g.link(1, 3);
        g
    }

    /// 3x3 grid over the unit square (0.5 spacing), orthogonal links plus
    /// diagonals 1-5 and 5-9:
    ///
    /// ```text
    /// 7───8───9
    /// │   │ ╱ │
    /// 4───5───6
    /// │ ╱ │   │
    /// 1───2───3
    /// ```
    fn grid_graph() -> Graph {
        let mut g = Graph::new();
        for row in 0..3_i64 {
            for col in 0..3_i64 {
                g.set_node(node(row * 3 + col + 1, col as f32 * 0.5, row as f32 * 0.5));
            }
        }
        for row in 0..3_i64 {
            for col in 0..3_i64 {
                let id = row * 3 + col + 1;
                if col < 2 {
                    g.link(id, id + 1);
                }
                if row < 2 {
                    g.link(id, id + 3);
                }
            }
        }
        g.link(1, 5);
        g.link(5, 9);
        g
    }

    /// Textbook shortest-path search: settle every node, relaxing costs,
    /// until the cost to `to_id` is exact. Used as a reference to check
    /// the A* result against.
    fn dijkstra_cost(g: &Graph, from_id: i64, to_id: i64) -> f32 {
        let mut costs: HashMap<i64, f32> = g.iter().map(|n| (n.id, f32::INFINITY)).collect();
        let mut unsettled: Vec<i64> = g.iter().map(|n| n.id).collect();
        costs.insert(from_id, 0.0);

        while !unsettled.is_empty() {
            let idx = (0..unsettled.len())
                .min_by(|a, b| {
                    costs[&unsettled[*a]]
                        .partial_cmp(&costs[&unsettled[*b]])
                        .unwrap()
                })
                .unwrap();
            let id = unsettled.swap_remove(idx);
            if costs[&id].is_infinite() {
                break;
            }

            let current = g.get_node(id).unwrap();
            for &neighbor_id in g.neighbors_of(id) {
                let neighbor = g.get_node(neighbor_id).unwrap();
                let through = costs[&id] + g.distance(&current, &neighbor);
                if through < costs[&neighbor_id] {
                    costs.insert(neighbor_id, through);
                }
            }
        }

        costs[&to_id]
    }

    #[test]
    fn diagonal_beats_detour() {
        let g = square_graph();
        let planner = RoutePlanner::new(&g, (0.0, 0.0), (100.0, 100.0)).unwrap();
        assert_eq!(planner.start_node().id, 1);
        assert_eq!(planner.end_node().id, 3);

        let route = planner.plan().unwrap();
        assert_eq!(ids(&route), [1, 3]);
        assert!((route.length - 2.0_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn endpoints_and_continuity() {
        let g = grid_graph();
        let route = RoutePlanner::new(&g, (100.0, 0.0), (0.0, 100.0))
            .unwrap()
            .plan()
            .unwrap();

        assert_eq!(route.waypoints.first().unwrap().id, 3);
        assert_eq!(route.waypoints.last().unwrap().id, 7);
        assert_continuous(&g, &route);
    }

    #[test]
    fn no_route_between_components() {
        let mut g = Graph::new();
        g.set_node(node(1, 0.0, 0.0));
        g.set_node(node(2, 0.1, 0.0));
        g.set_node(node(3, 0.9, 1.0));
        g.set_node(node(4, 1.0, 1.0));
        g.link(1, 2);
        g.link(3, 4);

        let result = RoutePlanner::new(&g, (0.0, 0.0), (100.0, 100.0))
            .unwrap()
            .plan();
        assert_eq!(result, Err(PlanError::NoPathFound { from: 1, to: 4 }));
    }

    #[test]
    fn empty_network_fails_fast() {
        let g = Graph::new();
        let result = RoutePlanner::new(&g, (25.0, 25.0), (75.0, 75.0));
        assert!(matches!(
            result,
            Err(PlanError::InvalidCoordinates(x, y)) if x == 25.0 && y == 25.0
        ));
    }

    #[test]
    fn length_uses_metric_scale() {
        let mut g = square_graph();
        g.set_metric_scale(1000.0);

        let route = RoutePlanner::new(&g, (0.0, 0.0), (100.0, 100.0))
            .unwrap()
            .plan()
            .unwrap();
        assert!((route.length - 1000.0 * 2.0_f32.sqrt()).abs() < 1e-2);
    }

    #[test]
    fn start_equals_end() {
        let g = square_graph();
        let route = RoutePlanner::new(&g, (0.0, 0.0), (0.0, 0.0))
            .unwrap()
            .plan()
            .unwrap();

        assert_eq!(ids(&route), [1]);
        assert_eq!(route.length, 0.0);
    }

    #[test]
    fn equal_cost_tie_break_is_deterministic() {
        // Square without the diagonal: both ways around from 1 to 3 cost
        // exactly 2. Node 2 is admitted before node 4 (adjacency order of
        // node 1), so the route through 2 must win, every time.
        let mut g = square_graph();
        g.delete_edge(1, 3);
        g.delete_edge(3, 1);

        for _ in 0..10 {
            let route = RoutePlanner::new(&g, (0.0, 0.0), (100.0, 100.0))
                .unwrap()
                .plan()
                .unwrap();
            assert_eq!(ids(&route), [1, 2, 3]);
            assert!((route.length - 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn matches_dijkstra_on_grid() {
        let g = grid_graph();
        for &(from, to, start, end) in &[
            (1, 9, (0.0, 0.0), (100.0, 100.0)),
            (3, 7, (100.0, 0.0), (0.0, 100.0)),
            (2, 8, (50.0, 0.0), (50.0, 100.0)),
        ] {
            let planner = RoutePlanner::new(&g, start, end).unwrap();
            assert_eq!(planner.start_node().id, from);
            assert_eq!(planner.end_node().id, to);

            let route = planner.plan().unwrap();
            assert_continuous(&g, &route);
            assert!(
                (route.length - dijkstra_cost(&g, from, to)).abs() < 1e-5,
                "route {}..{} is not shortest: {} long",
                from,
                to,
                route.length
            );
        }
    }

    #[test]
    fn planner_is_reusable() {
        let g = square_graph();
        let planner = RoutePlanner::new(&g, (0.0, 0.0), (100.0, 100.0)).unwrap();
        assert_eq!(planner.plan().unwrap(), planner.plan().unwrap());
    }

    #[test]
    fn plans_through_indexed_graph() {
        let g = square_graph();
        let indexed = IndexedGraph::new(&g);

        let plain = RoutePlanner::new(&g, (0.0, 0.0), (100.0, 100.0))
            .unwrap()
            .plan()
            .unwrap();
        let fast = RoutePlanner::new(&indexed, (0.0, 0.0), (100.0, 100.0))
            .unwrap()
            .plan()
            .unwrap();
        assert_eq!(plain, fast);
    }

    #[test]
    fn skips_adjacency_to_deleted_nodes() {
        let mut g = square_graph();
        g.delete_node(2); // node 1 still lists 2 as a neighbor

        let route = RoutePlanner::new(&g, (0.0, 0.0), (100.0, 100.0))
            .unwrap()
            .plan()
            .unwrap();
        assert_eq!(ids(&route), [1, 3]);
    }
}
