//! Grid layouts built from text.
//!
//! A [`Layout`] parses an ASCII map into obstacle flags plus optional start
//! and goal markers:
//!
//! | char | meaning |
//! |---|---|
//! | `.` | free cell |
//! | `#` | blocked cell |
//! | `S` | start (free) |
//! | `G` | goal (free) |

use crate::error::LayoutError;
use crate::geom::{Coord, Dims};

/// Character for a free cell.
pub const FREE: char = '.';
/// Character for a blocked cell.
pub const BLOCKED: char = '#';
/// Character marking the start cell.
pub const START: char = 'S';
/// Character marking the goal cell.
pub const GOAL: char = 'G';

/// A parsed rectangular map of free and blocked cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    dims: Dims,
    blocked: Vec<bool>,
    start: Option<Coord>,
    goal: Option<Coord>,
}

impl Layout {
    /// Parse a layout from text.
    ///
    /// Lines are separated by `'\n'` (a trailing `'\r'` is ignored) and must
    /// all have the same width. Surrounding whitespace of the whole text is
    /// trimmed, but not that of individual lines.
    pub fn parse(s: &str) -> Result<Self, LayoutError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut blocked = Vec::with_capacity(s.len());
        let mut start: Option<Coord> = None;
        let mut goal: Option<Coord> = None;
        let mut width: Option<usize> = None;
        let mut rows = 0usize;

        for (row, line) in s.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let mut cols = 0usize;
            for (col, ch) in line.chars().enumerate() {
                let coord = Coord::new(row as i32, col as i32);
                match ch {
                    FREE => blocked.push(false),
                    BLOCKED => blocked.push(true),
                    START | GOAL => {
                        let slot = if ch == START { &mut start } else { &mut goal };
                        if let Some(first) = *slot {
                            return Err(LayoutError::DuplicateMarker {
                                marker: ch,
                                first,
                                second: coord,
                            });
                        }
                        *slot = Some(coord);
                        blocked.push(false);
                    }
                    _ => return Err(LayoutError::InvalidChar { ch, coord }),
                }
                cols += 1;
            }
            match width {
                None => width = Some(cols),
                Some(expected) if expected != cols => {
                    return Err(LayoutError::InconsistentWidth {
                        line: row,
                        expected,
                        found: cols,
                    });
                }
                Some(_) => {}
            }
            rows += 1;
        }

        let cols = width.unwrap_or(0);
        let dims = Dims::new(rows as i32, cols as i32).map_err(|_| LayoutError::Empty)?;
        Ok(Self {
            dims,
            blocked,
            start,
            goal,
        })
    }

    /// Grid extents of the layout.
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Whether `c` is marked as blocked. Out-of-bounds cells are not.
    pub fn is_blocked(&self, c: Coord) -> bool {
        self.dims.index(c).is_some_and(|i| self.blocked[i])
    }

    /// The `S` marker, if any.
    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    /// The `G` marker, if any.
    pub fn goal(&self) -> Option<Coord> {
        self.goal
    }

    /// Iterate over all blocked coordinates in row-major order.
    pub fn blocked_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.dims.iter().filter(|&c| self.is_blocked(c))
    }
}
