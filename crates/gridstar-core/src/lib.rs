//! **gridstar-core**: geometry and layout primitives for grid search.
//!
//! This crate provides the foundational types shared across the *gridstar*
//! workspace: row/column coordinates, grid extents with row-major indexing
//! and 1-based cell numbering, and a parser for ASCII grid layouts.

pub mod error;
pub mod geom;
pub mod layout;

pub use error::{GridError, LayoutError};
pub use geom::{Coord, Dims, DimsIter};
pub use layout::Layout;
