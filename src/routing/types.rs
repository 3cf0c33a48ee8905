//! Core types for the grid router
//!
//! Cell vocabulary, grid coordinates and travel directions.

use std::fmt;
use std::str::FromStr;

use super::error::GridError;

/// The type of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// City block, never traversable
    Blocked,
    /// Avenue heading north
    OneWayNorth,
    /// Avenue heading south
    OneWaySouth,
    /// Street heading west
    OneWayWest,
    /// Street heading east
    OneWayEast,
    /// Crossing where turns are allowed
    Intersection,
    /// Route terminus
    Endpoint,
    Omnidirectional,
    /// Any token outside the vocabulary; behaves as a dead cell
    Unknown,
}

impl CellType {
    /// Maps a trimmed grid token to its cell type, `None` when unrecognized.
    pub fn from_token(token: &str) -> Option<Self> {
        let cell = match token {
            "0" => CellType::Blocked,
            "L" => CellType::OneWayWest,
            "R" => CellType::OneWayEast,
            "N" => CellType::OneWayNorth,
            "S" => CellType::OneWaySouth,
            "C" => CellType::Intersection,
            "SF" => CellType::Endpoint,
            "ND" => CellType::Omnidirectional,
            _ => return None,
        };
        Some(cell)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, CellType::Blocked)
    }

    /// Horizontal one-way cell (calle)
    pub fn is_street(&self) -> bool {
        matches!(self, CellType::OneWayWest | CellType::OneWayEast)
    }

    /// Vertical one-way cell (avenida)
    pub fn is_avenue(&self) -> bool {
        matches!(self, CellType::OneWayNorth | CellType::OneWaySouth)
    }

    /// The single direction a one-way cell lets traffic leave through
    pub fn one_way_direction(&self) -> Option<Direction> {
        match self {
            CellType::OneWayNorth => Some(Direction::North),
            CellType::OneWaySouth => Some(Direction::South),
            CellType::OneWayWest => Some(Direction::West),
            CellType::OneWayEast => Some(Direction::East),
            _ => None,
        }
    }

    /// Single character used when drawing the grid on the console
    pub fn glyph(&self) -> char {
        match self {
            CellType::Blocked => '#',
            CellType::OneWayNorth => '^',
            CellType::OneWaySouth => 'v',
            CellType::OneWayWest => '<',
            CellType::OneWayEast => '>',
            CellType::Intersection => '+',
            CellType::Endpoint => 'o',
            CellType::Omnidirectional => '.',
            CellType::Unknown => '?',
        }
    }
}

/// One of the four axis-aligned travel directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    /// Scan order used when emitting edges
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Column/row delta of one step in this direction (row grows southward)
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }

    /// The one-way cell type whose traffic flows in this direction
    pub fn one_way_cell(&self) -> CellType {
        match self {
            Direction::North => CellType::OneWayNorth,
            Direction::South => CellType::OneWaySouth,
            Direction::West => CellType::OneWayWest,
            Direction::East => CellType::OneWayEast,
        }
    }
}

/// A grid cell address, 0-indexed from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub column: usize,
    pub row: usize,
}

impl Coordinate {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Canonical `column,row` identifier used to address graph nodes
    pub fn id(&self) -> String {
        self.to_string()
    }

    /// The neighbor one step away, if it stays inside a `columns` x `rows` grid
    pub fn step(&self, direction: Direction, columns: usize, rows: usize) -> Option<Coordinate> {
        let (dc, dr) = direction.delta();
        let column = self.column.checked_add_signed(dc)?;
        let row = self.row.checked_add_signed(dr)?;
        (column < columns && row < rows).then_some(Coordinate { column, row })
    }

    pub fn manhattan_distance(&self, other: &Coordinate) -> usize {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.column, self.row)
    }
}

impl FromStr for Coordinate {
    type Err = GridError;

    /// Parses the exact `column,row` form: base-10, no surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GridError::InvalidCoordinate(s.to_string());
        let (column, row) = s.split_once(',').ok_or_else(invalid)?;
        let parse = |part: &str| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<usize>().map_err(|_| invalid())
        };
        Ok(Coordinate {
            column: parse(column)?,
            row: parse(row)?,
        })
    }
}

/// A 2D position in cell units, used for route animation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Center of a grid cell
    pub fn cell_center(coordinate: Coordinate) -> Self {
        Self {
            x: coordinate.column as f32 + 0.5,
            y: coordinate.row as f32 + 0.5,
        }
    }

    pub fn lerp(&self, other: &Position, t: f32) -> Position {
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}
