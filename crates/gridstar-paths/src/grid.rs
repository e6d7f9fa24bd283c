//! The searchable grid: obstacle flags plus per-cell search state.
//!
//! A [`Grid`] owns one [`Cell`] per coordinate in a flat row-major arena.
//! Predecessor links are arena indices, so the parent relation is a forest
//! over the arena and never aliases cell storage.

use gridstar_core::layout::{BLOCKED, FREE, GOAL, START};
use gridstar_core::{Coord, Dims, GridError, Layout};

use crate::neighbors::{Neighbors, Topology};
use crate::policy::{Cost, UNREACHABLE};
use crate::result::SearchResult;

/// Character used by [`Grid::render`] for path cells.
pub const PATH: char = '*';
/// Character used by [`Grid::render`] for closed (explored) cells.
pub const CLOSED: char = 'o';

/// A grid cell: its obstacle flag and the search fields left by the most
/// recent search.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub(crate) blocked: bool,
    pub(crate) g: Cost,
    pub(crate) h: Cost,
    pub(crate) f: f64,
    pub(crate) parent: Option<usize>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            blocked: false,
            g: UNREACHABLE,
            h: 0,
            f: f64::INFINITY,
            parent: None,
        }
    }
}

impl Cell {
    /// Whether the cell is an obstacle.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Best known cost from the start, or `None` if never reached.
    #[inline]
    pub fn g(&self) -> Option<Cost> {
        (self.g != UNREACHABLE).then_some(self.g)
    }

    /// Cached heuristic estimate to the goal (0 if never reached).
    #[inline]
    pub fn h(&self) -> Cost {
        self.h
    }

    /// Ordering key `g + h × bias` (`+∞` if never reached).
    #[inline]
    pub fn f(&self) -> f64 {
        self.f
    }

    pub(crate) fn reset_search(&mut self) {
        self.g = UNREACHABLE;
        self.h = 0;
        self.f = f64::INFINITY;
        self.parent = None;
    }
}

/// A fixed-size 2-D lattice of cells.
///
/// Obstacle flags may only change between searches; [`search`](crate::search)
/// borrows the grid mutably for its whole run.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    dims: Dims,
    pub(crate) cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell unblocked and no search state.
    ///
    /// Fails with [`GridError::InvalidDimension`] if `rows` or `cols` is ≤ 0.
    pub fn new(rows: i32, cols: i32) -> Result<Self, GridError> {
        Ok(Self::with_dims(Dims::new(rows, cols)?))
    }

    /// Create an open grid of the given extents.
    pub fn with_dims(dims: Dims) -> Self {
        Self {
            dims,
            cells: vec![Cell::default(); dims.len()],
        }
    }

    /// Create a grid whose obstacles match `layout`.
    pub fn from_layout(layout: &Layout) -> Self {
        let mut grid = Self::with_dims(layout.dims());
        for c in layout.blocked_cells() {
            if let Some(i) = grid.dims.index(c) {
                grid.cells[i].blocked = true;
            }
        }
        grid
    }

    /// Grid extents.
    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    #[inline]
    fn idx(&self, c: Coord) -> Result<usize, GridError> {
        self.dims.index(c).ok_or(GridError::OutOfBounds {
            coord: c,
            dims: self.dims,
        })
    }

    /// Set or clear the obstacle flag of a single cell.
    pub fn set_blocked(&mut self, c: Coord, blocked: bool) -> Result<(), GridError> {
        let i = self.idx(c)?;
        self.cells[i].blocked = blocked;
        Ok(())
    }

    /// Whether the cell at `c` is blocked.
    pub fn is_blocked(&self, c: Coord) -> Result<bool, GridError> {
        Ok(self.cells[self.idx(c)?].blocked)
    }

    /// Read-only view of the cell at `c`.
    pub fn cell(&self, c: Coord) -> Result<&Cell, GridError> {
        Ok(&self.cells[self.idx(c)?])
    }

    /// Predecessor of `c` on the best path found by the last search.
    pub fn parent_of(&self, c: Coord) -> Result<Option<Coord>, GridError> {
        let i = self.idx(c)?;
        Ok(self.cells[i].parent.map(|p| self.dims.coord(p)))
    }

    /// In-bounds neighbours of `c` under `topology`, blocked or not.
    pub fn neighbors(&self, c: Coord, topology: Topology) -> Result<Neighbors, GridError> {
        self.dims.check(c)?;
        Ok(Neighbors::new(c, self.dims, topology))
    }

    /// Number of blocked cells.
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|c| c.blocked).count()
    }

    /// Unblock every cell and drop all search state.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = Cell::default();
        }
    }

    /// Reset `g`, `h`, `f` and `parent` of every cell, keeping obstacles.
    pub fn reset_search(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.reset_search();
        }
    }

    /// Render the grid and a search result as text, one line per row.
    ///
    /// Uses the [`Layout`] alphabet for free/blocked cells and the
    /// endpoints, [`PATH`] for path cells and [`CLOSED`] for other explored
    /// cells.
    pub fn render(&self, result: &SearchResult) -> String {
        let mut out = String::with_capacity(self.dims.len() + self.dims.rows() as usize);
        for (i, c) in self.dims.iter().enumerate() {
            if c.col == 0 && c.row > 0 {
                out.push('\n');
            }
            let blocked = self.cells[i].blocked;
            let ch = if c == result.start {
                START
            } else if c == result.goal {
                GOAL
            } else if blocked {
                BLOCKED
            } else if result.path.contains(&c) {
                PATH
            } else if result.closed_set.contains(&c) {
                CLOSED
            } else {
                FREE
            };
            out.push(ch);
        }
        out
    }
}
