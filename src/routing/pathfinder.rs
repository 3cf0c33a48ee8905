//! Single-pair shortest path search
//!
//! Dijkstra with lazy deletion over a shared, read-only [`RoadNetwork`].
//! Costs and predecessors live in a per-call [`SearchState`] keyed by node
//! index, so concurrent searches never see each other's bookkeeping.

use log::debug;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::road_network::RoadNetwork;
use super::route::Route;
use super::types::Coordinate;

/// Best known cost and predecessor for every node touched by one search
#[derive(Debug, Default)]
struct SearchState {
    entries: HashMap<NodeIndex, (u32, Option<NodeIndex>)>,
    finalized: HashSet<NodeIndex>,
}

impl SearchState {
    fn new() -> Self {
        Self::default()
    }

    /// Best known cost, `None` standing in for infinity
    fn cost(&self, node: NodeIndex) -> Option<u32> {
        self.entries.get(&node).map(|(cost, _)| *cost)
    }

    fn relax(&mut self, node: NodeIndex, cost: u32, predecessor: Option<NodeIndex>) {
        self.entries.insert(node, (cost, predecessor));
    }

    fn predecessor(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.entries.get(&node).and_then(|(_, parent)| *parent)
    }

    /// Marks `node` finalized; false if it already was
    fn finalize(&mut self, node: NodeIndex) -> bool {
        self.finalized.insert(node)
    }

    fn is_finalized(&self, node: NodeIndex) -> bool {
        self.finalized.contains(&node)
    }
}

/// Queue entry ordered by cost, then by coordinate identifier
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry<'a> {
    cost: u32,
    id: &'a str,
    node: NodeIndex,
}

/// Finds the cheapest route from `start` to `end`.
///
/// Returns `None` when either cell is missing or blocked, or when one-way
/// rules leave the target unreachable.
pub fn find_path(network: &RoadNetwork, start: Coordinate, end: Coordinate) -> Option<Route> {
    let start_node = network.index_of(start)?;
    let end_node = network.index_of(end)?;
    let graph = network.graph();

    if graph[start_node].cell.is_blocked() || graph[end_node].cell.is_blocked() {
        debug!("No route {} -> {}: endpoint is blocked", start, end);
        return None;
    }

    let mut state = SearchState::new();
    let mut queue = BinaryHeap::new();

    state.relax(start_node, 0, None);
    queue.push(Reverse(QueueEntry {
        cost: 0,
        id: &graph[start_node].id,
        node: start_node,
    }));

    while let Some(Reverse(entry)) = queue.pop() {
        // Stale duplicate left behind by a later improvement
        if !state.finalize(entry.node) {
            continue;
        }

        if entry.node == end_node {
            let route = Route::new(reconstruct_path(network, &state, end_node), entry.cost);
            debug!("Route {} -> {} found, cost {}", start, end, route.cost);
            return Some(route);
        }

        for edge in graph.edges(entry.node) {
            let next = edge.target();
            if state.is_finalized(next) {
                continue;
            }

            let candidate = entry.cost + edge.weight().weight;
            if state.cost(next).map_or(true, |best| candidate < best) {
                state.relax(next, candidate, Some(entry.node));
                queue.push(Reverse(QueueEntry {
                    cost: candidate,
                    id: &graph[next].id,
                    node: next,
                }));
            }
        }
    }

    debug!("No route {} -> {}: target unreachable", start, end);
    None
}

/// Same as [`find_path`], addressing cells by their `column,row` identifiers.
/// Malformed identifiers are treated like missing cells.
pub fn find_path_by_id(network: &RoadNetwork, start_id: &str, end_id: &str) -> Option<Route> {
    let start = start_id.parse().ok()?;
    let end = end_id.parse().ok()?;
    find_path(network, start, end)
}

fn reconstruct_path(network: &RoadNetwork, state: &SearchState, end: NodeIndex) -> Vec<Coordinate> {
    let graph = network.graph();
    let mut path = vec![graph[end].coordinate];
    let mut current = end;

    while let Some(parent) = state.predecessor(current) {
        path.push(graph[parent].coordinate);
        current = parent;
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::grid::CityGrid;
    use crate::routing::road_network::build_graph;

    fn network(text: &str, peak: bool) -> RoadNetwork {
        build_graph(&CityGrid::parse(text).unwrap(), peak)
    }

    fn c(column: usize, row: usize) -> Coordinate {
        Coordinate::new(column, row)
    }

    #[test]
    fn test_same_cell_is_zero_cost() {
        let net = network("C;L;SF", false);
        for column in 0..3 {
            let route = find_path(&net, c(column, 0), c(column, 0)).unwrap();
            assert_eq!(route.path, vec![c(column, 0)]);
            assert_eq!(route.cost, 0);
        }
    }

    #[test]
    fn test_missing_endpoint_is_no_route() {
        let net = network("C;C", false);
        assert!(find_path(&net, c(0, 0), c(5, 0)).is_none());
        assert!(find_path(&net, c(9, 9), c(0, 0)).is_none());
        assert!(find_path_by_id(&net, "0,0", "not-a-cell").is_none());
    }

    #[test]
    fn test_blocked_target_is_no_route() {
        let net = network("L;0", false);
        assert!(find_path(&net, c(0, 0), c(1, 0)).is_none());
        assert!(find_path(&net, c(1, 0), c(1, 0)).is_none());
    }

    #[test]
    fn test_street_into_intersection_costs_destination_weight() {
        let text = "0;0\nC;L";
        let off_peak = find_path(&network(text, false), c(1, 1), c(0, 1)).unwrap();
        assert_eq!(off_peak.path, vec![c(1, 1), c(0, 1)]);
        assert_eq!(off_peak.cost, 2);

        let peak = find_path(&network(text, true), c(1, 1), c(0, 1)).unwrap();
        assert_eq!(peak.cost, 3);
    }

    #[test]
    fn test_one_way_is_not_symmetric() {
        let net = network("C;L;L;C", false);
        assert!(find_path(&net, c(3, 0), c(0, 0)).is_some());
        assert!(find_path(&net, c(0, 0), c(3, 0)).is_none());
    }

    #[test]
    fn test_picks_cheapest_route() {
        // Top row runs straight east; the loop through the bottom row is longer
        let text = "C;R;R;R;C\nS;0;0;0;N\nC;R;R;R;C";
        let net = network(text, false);
        let route = find_path_by_id(&net, "0,0", "4,0").unwrap();
        // East along the top: 2 + 2 + 2 + 2 (final intersection) = 8
        assert_eq!(route.cost, 8);
        assert_eq!(route.len(), 5);

        let peak = network(text, true);
        let route = find_path_by_id(&peak, "0,0", "4,0").unwrap();
        assert_eq!(route.cost, 2 + 2 + 2 + 3);
    }

    #[test]
    fn test_equal_cost_routes() {
        let text = "C;R;R;C\nS;0;0;S\nC;R;R;C";
        let net = network(text, false);
        let route = find_path(&net, c(0, 0), c(3, 2)).unwrap();
        // Down: S(1) + C(2) + R(2) + R(2) + C(2) = 9
        // East: R(2) + R(2) + C(2) + S(1) + C(2) = 9
        assert_eq!(route.cost, 9);
        assert_eq!(route.start(), Some(c(0, 0)));
        assert_eq!(route.end(), Some(c(3, 2)));
    }

    #[test]
    fn test_equal_cost_ties_are_deterministic() {
        let text = "C;R;R;C\nS;0;0;S\nC;R;R;C";
        let net = network(text, false);
        let first = find_path(&net, c(0, 0), c(3, 2)).unwrap();
        // "2,2" is settled before "3,1", so it becomes the target's predecessor
        assert_eq!(first.ids(), vec!["0,0", "0,1", "0,2", "1,2", "2,2", "3,2"]);
        for _ in 0..10 {
            assert_eq!(find_path(&net, c(0, 0), c(3, 2)).unwrap(), first);
        }
    }

    #[test]
    fn test_ties_follow_identifier_text_order() {
        // From 9,0 both 10,0 and 9,1 cost 2 and both lead into 10,1 for 2 more.
        // "10,0" sorts before "9,1" as text, though column 9 comes first.
        let text = "0;0;0;0;0;0;0;0;0;C;C\n0;0;0;0;0;0;0;0;0;C;C";
        let net = network(text, false);
        let route = find_path_by_id(&net, "9,0", "10,1").unwrap();
        assert_eq!(route.cost, 4);
        assert_eq!(route.ids(), vec!["9,0", "10,0", "10,1"]);
    }

    #[test]
    fn test_searches_do_not_share_state() {
        let net = network("C;R;C\nS;0;N\nC;L;C", false);
        let forward = find_path(&net, c(0, 0), c(2, 0)).unwrap();
        let around = find_path(&net, c(0, 0), c(0, 2)).unwrap();
        let again = find_path(&net, c(0, 0), c(2, 0)).unwrap();
        assert_eq!(forward, again);
        assert_eq!(around.cost, 1 + 2);
    }

    #[test]
    fn test_concurrent_searches_on_shared_network() {
        use std::sync::Arc;
        use std::thread;

        let net = Arc::new(network("C;R;C\nS;0;S\nC;L;C", true));
        let expected = find_path(&net, c(0, 0), c(2, 2));
        assert_eq!(expected.as_ref().map(|r| r.cost), Some(2 + 3 + 4 + 3));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let net = Arc::clone(&net);
                thread::spawn(move || find_path(&net, c(0, 0), c(2, 2)))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
