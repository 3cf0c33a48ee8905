//! Road network graph for pathfinding
//!
//! Built once per cost regime from a parsed grid and never mutated
//! afterwards, so any number of searches can share it.

use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::path::Path;

use super::cost::CostRegime;
use super::error::Result;
use super::grid::{CityGrid, ParseOptions};
use super::types::{CellType, Coordinate, Direction};

/// Node data for the road network graph
#[derive(Debug, Clone)]
pub struct GridNode {
    pub coordinate: Coordinate,
    pub cell: CellType,
    /// Canonical `column,row` identifier
    pub id: String,
}

/// Edge data for the road network graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadEdge {
    pub weight: u32,
}

/// An outgoing arc as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: Coordinate,
    pub weight: u32,
}

/// Whether traffic may leave a `source` cell toward a `target` cell lying
/// in `direction`.
///
/// One-way cells only emit along their own direction. Intersections emit
/// anywhere, provided the target accepts traffic arriving that way.
/// Endpoints, omnidirectional and unknown cells never emit.
pub fn can_move(source: CellType, direction: Direction, target: CellType) -> bool {
    if source.is_blocked() || target.is_blocked() {
        return false;
    }

    match source {
        CellType::OneWayNorth
        | CellType::OneWaySouth
        | CellType::OneWayWest
        | CellType::OneWayEast => source.one_way_direction() == Some(direction),
        CellType::Intersection => {
            target == direction.one_way_cell()
                || matches!(target, CellType::Intersection | CellType::Endpoint)
        }
        _ => false,
    }
}

/// Directed, weighted graph of a city grid under one cost regime
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    /// The underlying petgraph directed graph (one-way cells)
    graph: DiGraph<GridNode, RoadEdge>,

    /// Maps coordinates to their node indices in the graph
    coordinate_to_node: HashMap<Coordinate, NodeIndex>,

    regime: CostRegime,
    columns: usize,
    rows: usize,
}

impl RoadNetwork {
    /// Builds the graph for `grid` with weights from `regime`
    pub fn build(grid: &CityGrid, regime: CostRegime) -> Self {
        let mut graph = DiGraph::with_capacity(grid.columns() * grid.rows(), 0);
        let mut coordinate_to_node = HashMap::new();

        for (coordinate, cell) in grid.iter() {
            let node_index = graph.add_node(GridNode {
                coordinate,
                cell,
                id: coordinate.id(),
            });
            coordinate_to_node.insert(coordinate, node_index);
        }

        for (coordinate, cell) in grid.iter() {
            if cell.is_blocked() {
                continue;
            }
            let source = coordinate_to_node[&coordinate];

            for direction in Direction::ALL {
                let Some(neighbor) = coordinate.step(direction, grid.columns(), grid.rows())
                else {
                    continue;
                };
                let Some(target_cell) = grid.get(neighbor) else {
                    continue;
                };

                if can_move(cell, direction, target_cell) {
                    let target = coordinate_to_node[&neighbor];
                    graph.add_edge(
                        source,
                        target,
                        RoadEdge {
                            weight: regime.weight(target_cell),
                        },
                    );
                }
            }
        }

        debug!(
            "Built road network ({:?}): {} nodes, {} edges",
            regime,
            graph.node_count(),
            graph.edge_count()
        );

        Self {
            graph,
            coordinate_to_node,
            regime,
            columns: grid.columns(),
            rows: grid.rows(),
        }
    }

    /// Reads a grid file and builds its graph in one pass
    pub fn load(path: impl AsRef<Path>, options: &ParseOptions, regime: CostRegime) -> Result<Self> {
        let grid = CityGrid::load(path, options)?;
        Ok(Self::build(&grid, regime))
    }

    pub fn regime(&self) -> CostRegime {
        self.regime
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.coordinate_to_node.contains_key(&coordinate)
    }

    /// Node stored at a coordinate
    pub fn node(&self, coordinate: Coordinate) -> Option<&GridNode> {
        self.coordinate_to_node
            .get(&coordinate)
            .map(|index| &self.graph[*index])
    }

    /// Node addressed by its `column,row` identifier
    pub fn node_by_id(&self, id: &str) -> Option<&GridNode> {
        self.node(id.parse().ok()?)
    }

    /// Outgoing edges of a cell in N, S, W, E emission order
    pub fn edges_from(&self, coordinate: Coordinate) -> Option<Vec<Edge>> {
        let node_index = self.coordinate_to_node.get(&coordinate)?;

        // petgraph yields the most recently added edge first
        let mut edges: Vec<Edge> = self
            .graph
            .edges(*node_index)
            .map(|edge| Edge {
                target: self.graph[edge.target()].coordinate,
                weight: edge.weight().weight,
            })
            .collect();
        edges.reverse();

        Some(edges)
    }

    /// Every edge as `(source, target, weight)`, sorted
    pub fn edge_list(&self) -> Vec<(Coordinate, Coordinate, u32)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].coordinate,
                    self.graph[edge.target()].coordinate,
                    edge.weight().weight,
                )
            })
            .collect();
        edges.sort();
        edges
    }

    /// All nodes in row-major scan order
    pub fn nodes(&self) -> impl Iterator<Item = &GridNode> {
        self.graph.node_weights()
    }

    pub(crate) fn index_of(&self, coordinate: Coordinate) -> Option<NodeIndex> {
        self.coordinate_to_node.get(&coordinate).copied()
    }

    pub(crate) fn graph(&self) -> &DiGraph<GridNode, RoadEdge> {
        &self.graph
    }
}

/// Builds the road network for `grid` with the given rush-hour flag
pub fn build_graph(grid: &CityGrid, is_peak_hour: bool) -> RoadNetwork {
    RoadNetwork::build(grid, CostRegime::from_peak(is_peak_hour))
}
