use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the routing engine.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors raised while loading a city grid or addressing its cells.
///
/// A missing route is not an error: searches report it as `None`.
#[derive(Debug, Error)]
pub enum GridError {
    /// The grid source does not exist or could not be opened.
    #[error("grid source not found at {}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure while reading the grid source.
    #[error("failed to read grid source {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row whose cell count differs from the first row.
    #[error("malformed grid: row {row} has {found} cells, expected {expected}")]
    MalformedInput {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Token outside the cell vocabulary (strict parsing only).
    #[error("unrecognized cell token {token:?} at column {column}, row {row}")]
    UnknownToken {
        row: usize,
        column: usize,
        token: String,
    },

    #[error("hour {0} is outside 0..=23")]
    InvalidHour(u8),

    /// Identifier not in the canonical `column,row` form.
    #[error("invalid coordinate identifier {0:?}, expected \"column,row\"")]
    InvalidCoordinate(String),
}

impl GridError {
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            GridError::NotFound { path, source }
        } else {
            GridError::Io { path, source }
        }
    }
}
