//! Computed routes and the positions a vehicle passes along them

use std::fmt;

use super::types::{Coordinate, Position};

/// An ordered path from start to target, both included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: Vec<Coordinate>,
    pub cost: u32,
}

impl Route {
    pub fn new(path: Vec<Coordinate>, cost: u32) -> Self {
        Self { path, cost }
    }

    pub fn start(&self) -> Option<Coordinate> {
        self.path.first().copied()
    }

    pub fn end(&self) -> Option<Coordinate> {
        self.path.last().copied()
    }

    /// Number of cells visited, endpoints included
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.path.contains(&coordinate)
    }

    /// Canonical identifiers of the visited cells
    pub fn ids(&self) -> Vec<String> {
        self.path.iter().map(Coordinate::id).collect()
    }

    /// Interpolated cell-center positions, `steps_per_cell` per hop plus the
    /// final cell. The iterator is lazy and can be cloned to restart.
    pub fn positions(&self, steps_per_cell: usize) -> RoutePositions<'_> {
        RoutePositions {
            path: &self.path,
            steps: steps_per_cell.max(1),
            segment: 0,
            step: 0,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (cost {})", self.ids().join(" -> "), self.cost)
    }
}

/// Iterator over interpolated positions along a route
#[derive(Debug, Clone)]
pub struct RoutePositions<'a> {
    path: &'a [Coordinate],
    steps: usize,
    segment: usize,
    step: usize,
}

impl Iterator for RoutePositions<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let from = *self.path.get(self.segment)?;

        let Some(to) = self.path.get(self.segment + 1) else {
            // Final cell, emitted once
            self.segment += 1;
            return Some(Position::cell_center(from));
        };

        let t = self.step as f32 / self.steps as f32;
        let position = Position::cell_center(from).lerp(&Position::cell_center(*to), t);

        self.step += 1;
        if self.step == self.steps {
            self.step = 0;
            self.segment += 1;
        }

        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.path.len().checked_sub(self.segment) {
            None | Some(0) => 0,
            Some(cells) => (cells - 1) * self.steps - self.step + 1,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RoutePositions<'_> {}
