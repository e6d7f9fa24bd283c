use std::ops::ControlFlow;

use gridstar_core::{Coord, Dims};

use crate::open_set::OpenSet;
use crate::policy::Cost;

/// Receives a [`Snapshot`] after every expansion of a search.
///
/// Observers must not influence the outcome beyond stopping it: returning
/// [`ControlFlow::Break`] ends the search with
/// [`SearchStatus::Aborted`](crate::SearchStatus::Aborted). The goal
/// expansion is still reported, but a `Break` there is ignored since the
/// search has already succeeded.
pub trait SearchObserver {
    fn on_expand(&mut self, snapshot: &Snapshot<'_>) -> ControlFlow<()>;
}

/// Observer that does nothing (headless operation).
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    #[inline]
    fn on_expand(&mut self, _: &Snapshot<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Observer wrapping a closure, see [`from_fn`].
#[derive(Clone, Debug)]
pub struct FnObserver<F>(F);

/// Build an observer from a closure.
pub fn from_fn<F>(f: F) -> FnObserver<F>
where
    F: FnMut(&Snapshot<'_>) -> ControlFlow<()>,
{
    FnObserver(f)
}

impl<F> SearchObserver for FnObserver<F>
where
    F: FnMut(&Snapshot<'_>) -> ControlFlow<()>,
{
    #[inline]
    fn on_expand(&mut self, snapshot: &Snapshot<'_>) -> ControlFlow<()> {
        (self.0)(snapshot)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// View of an in-flight search right after a cell was closed.
///
/// The open and closed sets are borrowed from the engine and materialised
/// only on request, so headless observers pay nothing for them.
pub struct Snapshot<'a> {
    /// 0-based expansion counter.
    pub step: usize,
    /// The cell just closed.
    pub current: Coord,
    pub g: Cost,
    pub h: Cost,
    pub f: f64,
    pub(crate) dims: Dims,
    pub(crate) open: &'a OpenSet,
    pub(crate) best_g: &'a [Cost],
    pub(crate) closed: &'a [bool],
    pub(crate) expanded: &'a [usize],
}

impl Snapshot<'_> {
    /// Grid extents, e.g. for cell numbering.
    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Live open-set cells in the order they would be popped.
    pub fn open_cells(&self) -> Vec<Coord> {
        self.open
            .live(self.best_g, self.closed)
            .iter()
            .map(|e| self.dims.coord(e.idx))
            .collect()
    }

    /// Closed cells in expansion order, `current` last.
    pub fn closed_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.expanded.iter().map(|&i| self.dims.coord(i))
    }

    /// Owned copy of this snapshot.
    pub fn to_record(&self) -> StepRecord {
        StepRecord {
            step: self.step,
            current: self.current,
            g: self.g,
            h: self.h,
            f: self.f,
            open: self.open_cells(),
            closed: self.closed_cells().collect(),
        }
    }
}

/// Owned copy of a [`Snapshot`].
#[derive(Clone, Debug, PartialEq)]
pub struct StepRecord {
    pub step: usize,
    pub current: Coord,
    pub g: Cost,
    pub h: Cost,
    pub f: f64,
    pub open: Vec<Coord>,
    pub closed: Vec<Coord>,
}

/// Observer that keeps a [`StepRecord`] of every expansion.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    steps: Vec<StepRecord>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded steps, in expansion order.
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<StepRecord> {
        self.steps
    }
}

impl SearchObserver for Recorder {
    fn on_expand(&mut self, snapshot: &Snapshot<'_>) -> ControlFlow<()> {
        self.steps.push(snapshot.to_record());
        ControlFlow::Continue(())
    }
}
