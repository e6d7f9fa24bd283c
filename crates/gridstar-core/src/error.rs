//! Error types for grid construction, cell addressing and layout parsing.

use crate::geom::{Coord, Dims};

/// Errors raised when building or addressing a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A grid was requested with a non-positive row or column count.
    #[error("invalid grid dimensions {rows}x{cols}: both extents must be positive")]
    InvalidDimension { rows: i32, cols: i32 },
    /// A coordinate lies outside the grid extents.
    #[error("cell {coord} is outside the {dims} grid")]
    OutOfBounds { coord: Coord, dims: Dims },
}

/// Errors raised while parsing an ASCII [`Layout`](crate::Layout).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The text contained no cells.
    #[error("layout is empty")]
    Empty,
    /// A line does not have the same width as the first one.
    #[error("layout line {line} has width {found}, expected {expected}")]
    InconsistentWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A character outside the layout alphabet was found.
    #[error("layout contains invalid character \u{201c}{ch}\u{201d} at {coord}")]
    InvalidChar { ch: char, coord: Coord },
    /// A start or goal marker appears more than once.
    #[error("layout marker '{marker}' appears twice, at {first} and {second}")]
    DuplicateMarker {
        marker: char,
        first: Coord,
        second: Coord,
    },
}
