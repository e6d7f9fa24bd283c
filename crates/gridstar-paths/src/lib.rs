//! A* shortest-path search over 2-D grids.
//!
//! This crate provides:
//!
//! - a **grid model** ([`Grid`]) of passable/blocked cells that also carries
//!   the per-cell search fields (`g`, `h`, `f`, parent) of the last search;
//! - a **heuristic & cost policy** ([`SearchConfig`]): 4- or 8-way movement,
//!   Manhattan/Chebyshev/octile estimates, a step-cost table and a tie-break
//!   bias with optional seeded jitter;
//! - the **search engine** ([`search`], [`search_observed`]) with lazy
//!   deletion and a deterministic tie-break, plus per-step observation
//!   through [`SearchObserver`];
//! - a Dijkstra reference cost map ([`dijkstra_map`]).
//!
//! # Example
//!
//! ```
//! use gridstar_core::Coord;
//! use gridstar_paths::{Grid, SearchConfig, SearchStatus, search};
//!
//! let mut grid = Grid::new(5, 5).unwrap();
//! let result = search(
//!     &mut grid,
//!     Coord::new(0, 0),
//!     Coord::new(4, 4),
//!     &SearchConfig::four_way(),
//! )
//! .unwrap();
//! assert_eq!(result.status, SearchStatus::Succeeded);
//! assert_eq!(result.cost, Some(80));
//! ```

mod astar;
mod dijkstra;
mod distance;
mod error;
mod grid;
mod neighbors;
mod open_set;
mod policy;
mod result;
mod traits;

pub use astar::{search, search_observed};
pub use dijkstra::{CostMap, dijkstra_map};
pub use distance::{chebyshev, manhattan};
pub use error::{ConfigError, Endpoint, EndpointIssue, SearchError};
pub use grid::{CLOSED, Cell, Grid, PATH};
pub use neighbors::{Move, Neighbors, Topology};
pub use policy::{
    Cost, DEFAULT_BIAS, Heuristic, MAX_JITTER, SearchConfig, StepCosts, UNREACHABLE,
};
pub use result::{SearchResult, SearchStatus, path_cost};
pub use traits::{
    FnObserver, NoopObserver, Recorder, SearchObserver, Snapshot, StepRecord, from_fn,
};
