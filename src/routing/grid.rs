//! Grid parsing
//!
//! Turns delimited text into a rectangular matrix of cell types.

use log::{debug, warn};
use std::fs;
use std::path::Path;

use super::error::{GridError, Result};
use super::types::{CellType, Coordinate};

/// Options controlling how grid text is tokenized
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Field separator within a row
    pub delimiter: char,
    /// Reject unrecognized tokens instead of treating them as dead cells
    pub strict_tokens: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: ';',
            strict_tokens: false,
        }
    }
}

/// A rectangular, immutable matrix of cells in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityGrid {
    cells: Vec<CellType>,
    columns: usize,
    rows: usize,
}

impl CityGrid {
    /// Builds a grid from explicit rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<CellType>>) -> Result<Self> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns) {
            return Err(GridError::MalformedInput {
                row: index,
                expected: columns,
                found: row.len(),
            });
        }

        Ok(Self {
            columns,
            rows: rows.len(),
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Parses grid text with the default options
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, &ParseOptions::default())
    }

    /// Parses grid text: one row per line, cells split on the delimiter
    pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut rows = Vec::new();

        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            let row_index = rows.len();
            let row = line
                .split(options.delimiter)
                .enumerate()
                .map(|(column, raw)| {
                    let token = raw.trim();
                    match CellType::from_token(token) {
                        Some(cell) => Ok(cell),
                        None if options.strict_tokens => Err(GridError::UnknownToken {
                            row: row_index,
                            column,
                            token: token.to_string(),
                        }),
                        None => {
                            warn!(
                                "Unrecognized cell token {:?} at {},{}; treating as dead cell",
                                token, column, row_index
                            );
                            Ok(CellType::Unknown)
                        }
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }

        let grid = Self::from_rows(rows)?;
        debug!("Parsed grid: {} columns x {} rows", grid.columns, grid.rows);
        Ok(grid)
    }

    /// Reads and parses a grid file
    pub fn load(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| GridError::from_io(path.to_path_buf(), e))?;
        Self::parse_with(&text, options)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at a coordinate, `None` when out of bounds
    pub fn get(&self, coordinate: Coordinate) -> Option<CellType> {
        if coordinate.column >= self.columns || coordinate.row >= self.rows {
            return None;
        }
        self.cells
            .get(coordinate.row * self.columns + coordinate.column)
            .copied()
    }

    /// All cells in row-major scan order
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, CellType)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            (Coordinate::new(index % columns, index / columns), *cell)
        })
    }
}
