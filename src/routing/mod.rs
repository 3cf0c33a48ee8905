//! Grid routing engine
//!
//! Parses a city grid, turns it into a directed weighted graph under a
//! time-of-day cost regime and finds least-cost routes across it. Nothing
//! here depends on a UI; collaborators build a graph and ask for paths.

mod cost;
mod error;
mod grid;
mod pathfinder;
mod planner;
mod road_network;
mod route;
mod types;

pub use cost::{
    is_peak_hour, weight, CostRegime, COST_AVENUE_OFF_PEAK, COST_AVENUE_PEAK, COST_DEFAULT,
    COST_INTERSECTION_OFF_PEAK, COST_INTERSECTION_PEAK, COST_STREET, PEAK_WINDOWS,
};
pub use error::{GridError, Result};
pub use grid::{CityGrid, ParseOptions};
pub use pathfinder::{find_path, find_path_by_id};
pub use planner::{RoutePlanner, DEFAULT_HOUR};
pub use road_network::{build_graph, can_move, Edge, GridNode, RoadEdge, RoadNetwork};
pub use route::{Route, RoutePositions};
pub use types::{CellType, Coordinate, Direction, Position};
