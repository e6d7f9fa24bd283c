//! Geometry primitives: [`Coord`] and [`Dims`].
//!
//! Cells are addressed by `(row, col)` with rows growing downwards. A grid
//! of [`Dims`] covers the half-open rectangle `[0, rows) × [0, cols)` and is
//! stored row-major.

use std::fmt;
use std::ops::{Add, Sub};

use crate::error::GridError;

// ---------------------------------------------------------------------------
// Coord
// ---------------------------------------------------------------------------

/// A cell coordinate. Ordering is row-major (row first, then column).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { row: 0, col: 0 };

    /// Create a new coordinate.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Return a coordinate shifted by (drow, dcol).
    #[inline]
    pub const fn shift(self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// Absolute row and column distance to `other`.
    #[inline]
    pub fn delta(self, other: Coord) -> (i32, i32) {
        ((self.row - other.row).abs(), (self.col - other.col).abs())
    }

    /// Whether `other` is one king move away (orthogonal or diagonal).
    #[inline]
    pub fn is_adjacent8(self, other: Coord) -> bool {
        let (dr, dc) = self.delta(other);
        dr.max(dc) == 1
    }

    /// Whether `other` is one orthogonal step away.
    #[inline]
    pub fn is_adjacent4(self, other: Coord) -> bool {
        let (dr, dc) = self.delta(other);
        dr + dc == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Coord {
    #[inline]
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl Add for Coord {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Coord {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.row - rhs.row, self.col - rhs.col)
    }
}

// ---------------------------------------------------------------------------
// Dims
// ---------------------------------------------------------------------------

/// Extents of a rectangular grid. Both extents are always positive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "(i32, i32)", into = "(i32, i32)"))]
pub struct Dims {
    rows: i32,
    cols: i32,
}

impl Dims {
    /// Validate and create grid extents.
    ///
    /// Fails with [`GridError::InvalidDimension`] if either extent is ≤ 0.
    pub fn new(rows: i32, cols: i32) -> Result<Self, GridError> {
        if rows <= 0 || cols <= 0 {
            return Err(GridError::InvalidDimension { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(self) -> i32 {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(self) -> i32 {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Always `false`: extents are validated to be positive.
    #[inline]
    pub fn is_empty(self) -> bool {
        false
    }

    /// Whether `c` lies inside the grid.
    #[inline]
    pub fn contains(self, c: Coord) -> bool {
        c.row >= 0 && c.row < self.rows && c.col >= 0 && c.col < self.cols
    }

    /// Return `c` unchanged if it is inside the grid, or
    /// [`GridError::OutOfBounds`] otherwise.
    #[inline]
    pub fn check(self, c: Coord) -> Result<Coord, GridError> {
        if self.contains(c) {
            Ok(c)
        } else {
            Err(GridError::OutOfBounds {
                coord: c,
                dims: self,
            })
        }
    }

    /// Row-major flat index of `c`, or `None` if out of bounds.
    #[inline]
    pub fn index(self, c: Coord) -> Option<usize> {
        if !self.contains(c) {
            return None;
        }
        Some(c.row as usize * self.cols as usize + c.col as usize)
    }

    /// Convert a flat index back to a coordinate.
    ///
    /// `idx` must be smaller than [`len`](Self::len).
    #[inline]
    pub fn coord(self, idx: usize) -> Coord {
        let cols = self.cols as usize;
        Coord::new((idx / cols) as i32, (idx % cols) as i32)
    }

    /// 1-based row-major cell number: the top-left cell is 1 and the
    /// bottom-right cell is `rows × cols`.
    #[inline]
    pub fn number(self, c: Coord) -> Option<usize> {
        self.index(c).map(|i| i + 1)
    }

    /// Inverse of [`number`](Self::number).
    #[inline]
    pub fn from_number(self, n: usize) -> Option<Coord> {
        if n == 0 || n > self.len() {
            return None;
        }
        Some(self.coord(n - 1))
    }

    /// Row-major iterator over every coordinate in the grid.
    #[inline]
    pub fn iter(self) -> DimsIter {
        DimsIter {
            dims: self,
            next: 0,
        }
    }
}

impl TryFrom<(i32, i32)> for Dims {
    type Error = GridError;

    fn try_from((rows, cols): (i32, i32)) -> Result<Self, GridError> {
        Self::new(rows, cols)
    }
}

impl From<Dims> for (i32, i32) {
    fn from(d: Dims) -> Self {
        (d.rows, d.cols)
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

impl IntoIterator for Dims {
    type Item = Coord;
    type IntoIter = DimsIter;
    #[inline]
    fn into_iter(self) -> DimsIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// DimsIter
// ---------------------------------------------------------------------------

/// Row-major iterator over the coordinates of a [`Dims`].
#[derive(Clone, Debug)]
pub struct DimsIter {
    dims: Dims,
    next: usize,
}

impl Iterator for DimsIter {
    type Item = Coord;

    #[inline]
    fn next(&mut self) -> Option<Coord> {
        if self.next >= self.dims.len() {
            return None;
        }
        let c = self.dims.coord(self.next);
        self.next += 1;
        Some(c)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.dims.len().saturating_sub(self.next);
        (rem, Some(rem))
    }
}

impl ExactSizeIterator for DimsIter {}
