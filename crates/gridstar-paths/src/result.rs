use std::collections::BTreeSet;

use gridstar_core::Coord;

use crate::neighbors::Topology;
use crate::policy::{Cost, StepCosts};

/// Terminal state of a search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    /// The goal was reached.
    Succeeded,
    /// The open set was exhausted: no path exists.
    Failed,
    /// The observer stopped the search before it finished.
    Aborted,
}

/// Outcome of a search.
///
/// `path` is empty unless `status` is [`SearchStatus::Succeeded`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    pub status: SearchStatus,
    pub start: Coord,
    pub goal: Coord,
    /// Cells from `start` to `goal`, both inclusive.
    pub path: Vec<Coord>,
    /// Total cost of `path`.
    pub cost: Option<Cost>,
    /// Every cell that was expanded.
    pub closed_set: BTreeSet<Coord>,
    /// Expanded cells in expansion order.
    pub expanded: Vec<Coord>,
}

impl SearchResult {
    /// Whether a path was found.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status == SearchStatus::Succeeded
    }
}

/// Total cost of walking `path` under `costs`.
///
/// Returns `None` if two consecutive cells are not adjacent under
/// `topology` or the total overflows [`Cost`]. An empty or single-cell path
/// costs 0.
pub fn path_cost(path: &[Coord], topology: Topology, costs: StepCosts) -> Option<Cost> {
    path.windows(2).try_fold(0, |acc: Cost, w| {
        let mv = topology.step(w[0], w[1])?;
        acc.checked_add(costs.cost(mv))
    })
}
