//! Route planner that ties everything together
//!
//! Owns the parsed grid and the road network for the active hour. When the
//! hour moves into another cost regime a new network is built on the side
//! and swapped in, so searches already holding the old one are unaffected.

use log::info;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::cost::CostRegime;
use super::error::Result;
use super::grid::{CityGrid, ParseOptions};
use super::pathfinder::{find_path, find_path_by_id};
use super::road_network::RoadNetwork;
use super::route::Route;
use super::types::Coordinate;

/// Hour used when none is given
pub const DEFAULT_HOUR: u8 = 12;

struct PlannerState {
    hour: u8,
    network: Arc<RoadNetwork>,
}

/// Holds the city grid and the network for the current hour of day
pub struct RoutePlanner {
    grid: CityGrid,
    state: RwLock<PlannerState>,
}

impl RoutePlanner {
    pub fn new(grid: CityGrid, hour: u8) -> Result<Self> {
        let regime = CostRegime::for_hour(hour)?;
        let network = Arc::new(RoadNetwork::build(&grid, regime));
        Ok(Self {
            grid,
            state: RwLock::new(PlannerState { hour, network }),
        })
    }

    /// Load a grid file and build the network for `hour`
    pub fn from_file(path: impl AsRef<Path>, options: &ParseOptions, hour: u8) -> Result<Self> {
        let grid = CityGrid::load(path, options)?;
        Self::new(grid, hour)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, PlannerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, PlannerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn grid(&self) -> &CityGrid {
        &self.grid
    }

    pub fn hour(&self) -> u8 {
        self.read_state().hour
    }

    pub fn regime(&self) -> CostRegime {
        self.read_state().network.regime()
    }

    /// Snapshot of the current network, safe to search from any thread
    pub fn network(&self) -> Arc<RoadNetwork> {
        Arc::clone(&self.read_state().network)
    }

    /// Change the hour of day. Returns `true` if the network was rebuilt.
    pub fn set_hour(&self, hour: u8) -> Result<bool> {
        let regime = CostRegime::for_hour(hour)?;
        let mut state = self.write_state();
        state.hour = hour;
        Ok(self.swap_network(&mut state, regime))
    }

    /// Force a cost regime regardless of the hour. Returns `true` if the
    /// network was rebuilt.
    pub fn set_regime(&self, regime: CostRegime) -> bool {
        let mut state = self.write_state();
        self.swap_network(&mut state, regime)
    }

    /// Replaces the network under the caller's write guard, so the hour and
    /// the regime always change together. Outstanding snapshots keep the old one.
    fn swap_network(&self, state: &mut PlannerState, regime: CostRegime) -> bool {
        if state.network.regime() == regime {
            return false;
        }

        state.network = Arc::new(RoadNetwork::build(&self.grid, regime));
        info!("Switched road network to {:?}", regime);
        true
    }

    /// Cheapest route under the current hour's costs
    pub fn find_route(&self, from: Coordinate, to: Coordinate) -> Option<Route> {
        find_path(&self.network(), from, to)
    }

    /// Like [`find_route`](Self::find_route), with `column,row` identifiers
    pub fn find_route_by_id(&self, from: &str, to: &str) -> Option<Route> {
        find_path_by_id(&self.network(), from, to)
    }

    /// Switch to the departure hour, then search
    pub fn plan_trip(
        &self,
        from: Coordinate,
        to: Coordinate,
        departure_hour: u8,
    ) -> Result<Option<Route>> {
        self.set_hour(departure_hour)?;
        Ok(self.find_route(from, to))
    }

    /// ASCII map of the grid, with an optional route drawn over it.
    ///
    /// `A` marks the start, `B` the target and `*` the cells in between.
    pub fn render_map(&self, route: Option<&Route>) -> String {
        let mut map = vec![vec![' '; self.grid.columns()]; self.grid.rows()];
        let mut mark = |coordinate: Coordinate, glyph: char| {
            // Routes from another grid may fall outside this one
            if let Some(slot) = map
                .get_mut(coordinate.row)
                .and_then(|row| row.get_mut(coordinate.column))
            {
                *slot = glyph;
            }
        };

        for (coordinate, cell) in self.grid.iter() {
            mark(coordinate, cell.glyph());
        }

        if let Some(route) = route {
            for coordinate in &route.path {
                mark(*coordinate, '*');
            }
            if let Some(start) = route.start() {
                mark(start, 'A');
            }
            if let Some(end) = route.end() {
                mark(end, 'B');
            }
        }

        let border = format!("+{}+", "-".repeat(self.grid.columns()));
        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');
        for row in map {
            out.push('|');
            out.extend(row);
            out.push_str("|\n");
        }
        out.push_str(&border);
        out.push('\n');
        out
    }

    pub fn draw_map(&self, route: Option<&Route>) {
        print!("{}", self.render_map(route));
    }

    pub fn print_summary(&self) {
        let network = self.network();
        println!("=== Grid Router Summary ===");
        println!(
            "Grid: {} columns x {} rows",
            self.grid.columns(),
            self.grid.rows()
        );
        println!("Hour: {} ({:?})", self.hour(), network.regime());
        println!(
            "Nodes: {}, Edges: {}",
            network.node_count(),
            network.edge_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITY: &str = "C;R;C\nS;0;N\nC;L;C";

    fn planner(hour: u8) -> RoutePlanner {
        RoutePlanner::new(CityGrid::parse(CITY).unwrap(), hour).unwrap()
    }

    #[test]
    fn test_invalid_hour_rejected() {
        assert!(RoutePlanner::new(CityGrid::parse(CITY).unwrap(), 24).is_err());
        assert!(planner(3).set_hour(30).is_err());
    }

    #[test]
    fn test_rebuild_only_on_regime_change() {
        let planner = planner(3);
        assert_eq!(planner.regime(), CostRegime::OffPeak);

        assert!(!planner.set_hour(4).unwrap());
        assert_eq!(planner.hour(), 4);

        assert!(planner.set_hour(7).unwrap());
        assert_eq!(planner.regime(), CostRegime::Peak);
        assert!(!planner.set_hour(8).unwrap());

        assert!(planner.set_regime(CostRegime::OffPeak));
        assert!(!planner.set_regime(CostRegime::OffPeak));
    }

    #[test]
    fn test_old_snapshot_survives_rebuild() {
        let planner = planner(3);
        let before = planner.network();
        planner.set_hour(18).unwrap();
        let after = planner.network();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.regime(), CostRegime::OffPeak);
        assert_eq!(after.regime(), CostRegime::Peak);

        let from = Coordinate::new(0, 0);
        let to = Coordinate::new(0, 2);
        assert_eq!(find_path(&before, from, to).unwrap().cost, 1 + 2);
        assert_eq!(find_path(&after, from, to).unwrap().cost, 4 + 3);
    }

    #[test]
    fn test_plan_trip_uses_departure_hour() {
        let planner = planner(3);
        let route = planner
            .plan_trip(Coordinate::new(0, 0), Coordinate::new(2, 0), 19)
            .unwrap()
            .unwrap();
        assert_eq!(route.cost, 2 + 3);
        assert_eq!(planner.hour(), 19);
    }

    #[test]
    fn test_render_map_overlays_route() {
        let planner = planner(3);
        let route = planner.find_route_by_id("0,0", "2,0").unwrap();
        let map = planner.render_map(Some(&route));
        assert_eq!(map, "+---+\n|A*B|\n|v#^|\n|+<+|\n+---+\n");

        let plain = planner.render_map(None);
        assert!(plain.contains("|+>+|"));
    }

    #[test]
    fn test_render_map_ignores_cells_outside_grid() {
        let planner = RoutePlanner::new(CityGrid::parse("C;L").unwrap(), 3).unwrap();
        let stray = Route::new(vec![Coordinate::new(5, 5), Coordinate::new(1, 0)], 0);
        assert_eq!(planner.render_map(Some(&stray)), "+--+\n|+B|\n+--+\n");
    }

    #[test]
    fn test_concurrent_hour_changes_keep_regime_in_step() {
        use std::thread;

        let planner = Arc::new(planner(3));
        for _ in 0..200 {
            let handles: Vec<_> = [7u8, 3u8]
                .into_iter()
                .map(|hour| {
                    let planner = Arc::clone(&planner);
                    thread::spawn(move || planner.set_hour(hour).unwrap())
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            let regime = CostRegime::for_hour(planner.hour()).unwrap();
            assert_eq!(regime, planner.regime(), "hour {}", planner.hour());
        }
    }
}
