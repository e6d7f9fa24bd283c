use std::collections::BTreeSet;

use gridstar_core::Coord;

use crate::error::{Endpoint, EndpointIssue, SearchError};
use crate::grid::Grid;
use crate::neighbors::Neighbors;
use crate::open_set::OpenSet;
use crate::policy::{Cost, SearchConfig, TieBreak, UNREACHABLE};
use crate::result::{SearchResult, SearchStatus};
use crate::traits::{NoopObserver, SearchObserver, Snapshot};

/// Find a shortest path from `start` to `goal` with A*.
///
/// Returns `Ok` with [`SearchStatus::Failed`] and an empty path when the goal
/// is unreachable; `Err` is reserved for invalid endpoints or configuration.
/// `start == goal` yields a single-cell path of cost 0.
///
/// On return the grid cells hold the `g`, `h`, `f` and parent values of this
/// search.
pub fn search(
    grid: &mut Grid,
    start: Coord,
    goal: Coord,
    config: &SearchConfig,
) -> Result<SearchResult, SearchError> {
    search_observed(grid, start, goal, config, &mut NoopObserver)
}

/// Like [`search`], calling `observer` after every expansion.
pub fn search_observed<O: SearchObserver + ?Sized>(
    grid: &mut Grid,
    start: Coord,
    goal: Coord,
    config: &SearchConfig,
    observer: &mut O,
) -> Result<SearchResult, SearchError> {
    config.validate_for(grid.dims())?;
    let start_idx = endpoint(grid, Endpoint::Start, start)?;
    let goal_idx = endpoint(grid, Endpoint::Goal, goal)?;
    Ok(Astar::new(grid, config, start_idx, goal_idx).run(observer))
}

fn endpoint(grid: &Grid, endpoint: Endpoint, coord: Coord) -> Result<usize, SearchError> {
    let invalid = |reason| SearchError::InvalidEndpoints {
        endpoint,
        coord,
        reason,
    };
    let idx = grid
        .dims()
        .index(coord)
        .ok_or_else(|| invalid(EndpointIssue::OutOfBounds))?;
    if grid.cells[idx].blocked {
        return Err(invalid(EndpointIssue::Blocked));
    }
    Ok(idx)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Ready,
    Running,
    Done(SearchStatus),
}

/// State of one in-flight search. Created per call and dropped on return.
struct Astar<'a> {
    grid: &'a mut Grid,
    config: &'a SearchConfig,
    start: usize,
    goal: usize,
    goal_coord: Coord,
    open: OpenSet,
    best_g: Vec<Cost>,
    closed: Vec<bool>,
    expanded: Vec<usize>,
    tie: TieBreak,
    phase: Phase,
}

impl<'a> Astar<'a> {
    fn new(grid: &'a mut Grid, config: &'a SearchConfig, start: usize, goal: usize) -> Self {
        let len = grid.dims().len();
        let goal_coord = grid.dims().coord(goal);
        Self {
            grid,
            config,
            start,
            goal,
            goal_coord,
            open: OpenSet::new(),
            best_g: vec![UNREACHABLE; len],
            closed: vec![false; len],
            expanded: Vec::new(),
            tie: TieBreak::new(config),
            phase: Phase::Ready,
        }
    }

    /// Ready → Running: clear stale cell state and seed the open set.
    fn begin(&mut self) {
        debug_assert_eq!(self.phase, Phase::Ready);
        self.grid.reset_search();

        let dims = self.grid.dims();
        let start = dims.coord(self.start);
        let cfg = self.config;
        let h = cfg.heuristic.estimate(start, self.goal_coord, cfg.costs);
        let f = f64::from(h) * self.tie.bias();

        let cell = &mut self.grid.cells[self.start];
        cell.g = 0;
        cell.h = h;
        cell.f = f;
        cell.parent = None;
        self.best_g[self.start] = 0;
        self.open.push(self.start, 0, h, f);

        log::debug!(
            "A* {} #{} -> {} #{} ({:?}, {:?}, bias {})",
            start,
            self.start + 1,
            self.goal_coord,
            self.goal + 1,
            cfg.topology,
            cfg.heuristic,
            cfg.bias,
        );
        if !cfg.heuristic.is_admissible_for(cfg.topology) {
            log::warn!(
                "{:?} heuristic is not admissible for {:?}; paths may be suboptimal",
                cfg.heuristic,
                cfg.topology
            );
        }
        let inflation = f64::from(h) * (cfg.bias + cfg.jitter - 1.0);
        if inflation >= f64::from(cfg.costs.resolution(cfg.topology)) {
            log::warn!(
                "tie-break bias {} inflates h({}) = {} by {:.3}; paths may be suboptimal",
                cfg.bias,
                start,
                h,
                inflation
            );
        }

        self.phase = Phase::Running;
    }

    fn run<O: SearchObserver + ?Sized>(mut self, observer: &mut O) -> SearchResult {
        self.begin();

        let status = loop {
            let Some(entry) = self.open.pop() else {
                break SearchStatus::Failed;
            };
            let ci = entry.idx;

            // Skip stale entries.
            if !entry.is_live(&self.best_g, &self.closed) {
                continue;
            }

            self.closed[ci] = true;
            self.expanded.push(ci);

            let current = self.grid.dims().coord(ci);
            log::trace!(
                "expand {} #{} f={:.3} g={} h={}",
                current,
                ci + 1,
                entry.f,
                entry.g,
                entry.h
            );

            let snapshot = Snapshot {
                step: self.expanded.len() - 1,
                current,
                g: entry.g,
                h: entry.h,
                f: entry.f,
                dims: self.grid.dims(),
                open: &self.open,
                best_g: &self.best_g,
                closed: &self.closed,
                expanded: &self.expanded,
            };
            let flow = observer.on_expand(&snapshot);
            if ci == self.goal {
                break SearchStatus::Succeeded;
            }
            if flow.is_break() {
                break SearchStatus::Aborted;
            }

            self.relax(ci, current);
        };

        self.finish(status)
    }

    /// Push every improvable open neighbour of `ci`.
    fn relax(&mut self, ci: usize, current: Coord) {
        let dims = self.grid.dims();
        let cfg = self.config;
        let current_g = self.best_g[ci];

        for (np, mv) in Neighbors::new(current, dims, cfg.topology) {
            let Some(ni) = dims.index(np) else {
                continue;
            };
            if self.grid.cells[ni].blocked || self.closed[ni] {
                continue;
            }
            let tentative_g = current_g.saturating_add(cfg.costs.cost(mv));
            if tentative_g >= self.best_g[ni] {
                continue;
            }

            let h = cfg.heuristic.estimate(np, self.goal_coord, cfg.costs);
            let f = f64::from(tentative_g) + f64::from(h) * self.tie.weight();

            let n = &mut self.grid.cells[ni];
            n.g = tentative_g;
            n.h = h;
            n.f = f;
            n.parent = Some(ci);
            self.best_g[ni] = tentative_g;
            self.open.push(ni, tentative_g, h, f);
        }
    }

    /// Running → Done: build the result and drop the search state.
    fn finish(mut self, status: SearchStatus) -> SearchResult {
        self.phase = Phase::Done(status);
        let dims = self.grid.dims();

        let (path, cost) = if status == SearchStatus::Succeeded {
            (self.reconstruct(), Some(self.best_g[self.goal]))
        } else {
            (Vec::new(), None)
        };
        let expanded: Vec<Coord> = self.expanded.iter().map(|&i| dims.coord(i)).collect();
        let closed_set: BTreeSet<Coord> = expanded.iter().copied().collect();

        log::debug!(
            "A* {:?}: {} path cells, cost {:?}, {} closed, {} open entries left",
            self.phase,
            path.len(),
            cost,
            closed_set.len(),
            self.open.len(),
        );

        SearchResult {
            status,
            start: dims.coord(self.start),
            goal: self.goal_coord,
            path,
            cost,
            closed_set,
            expanded,
        }
    }

    /// Walk parent links from the goal back to the start.
    fn reconstruct(&self) -> Vec<Coord> {
        let dims = self.grid.dims();
        let mut path = Vec::new();
        let mut ci = Some(self.goal);
        while let Some(i) = ci {
            path.push(dims.coord(i));
            debug_assert!(path.len() <= dims.len(), "cycle in parent links");
            ci = self.grid.cells[i].parent;
        }
        path.reverse();
        debug_assert_eq!(path.first().copied(), Some(dims.coord(self.start)));
        path
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use super::*;
    use crate::error::ConfigError;
    use crate::neighbors::Topology;
    use crate::policy::{Heuristic, StepCosts};
    use crate::result::path_cost;
    use crate::traits::{Recorder, from_fn};
    use gridstar_core::Layout;

    fn grid(s: &str) -> (Grid, Coord, Coord) {
        let l = Layout::parse(s).unwrap();
        (Grid::from_layout(&l), l.start().unwrap(), l.goal().unwrap())
    }

    #[test]
    fn open_grid_four_way() {
        let mut g = Grid::new(5, 5).unwrap();
        let r = search(
            &mut g,
            Coord::new(0, 0),
            Coord::new(4, 4),
            &SearchConfig::four_way(),
        )
        .unwrap();
        assert_eq!(r.status, SearchStatus::Succeeded);
        assert_eq!(r.path.len(), 9);
        assert_eq!(r.cost, Some(80));
        assert_eq!(r.path.first(), Some(&Coord::new(0, 0)));
        assert_eq!(r.path.last(), Some(&Coord::new(4, 4)));
        assert!(r.closed_set.contains(&Coord::new(4, 4)));
    }

    #[test]
    fn start_equals_goal() {
        let mut g = Grid::new(3, 3).unwrap();
        let c = Coord::new(1, 1);
        let r = search(&mut g, c, c, &SearchConfig::eight_way()).unwrap();
        assert_eq!(r.status, SearchStatus::Succeeded);
        assert_eq!(r.path, vec![c]);
        assert_eq!(r.cost, Some(0));
        assert_eq!(r.expanded, vec![c]);
    }

    #[test]
    fn invalid_endpoints() {
        let mut g = Grid::new(3, 3).unwrap();
        g.set_blocked(Coord::new(1, 1), true).unwrap();
        let cfg = SearchConfig::four_way();

        let err = search(&mut g, Coord::new(3, 0), Coord::new(0, 0), &cfg).unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidEndpoints {
                endpoint: Endpoint::Start,
                coord: Coord::new(3, 0),
                reason: EndpointIssue::OutOfBounds
            }
        );

        let err = search(&mut g, Coord::new(0, 0), Coord::new(1, 1), &cfg).unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidEndpoints {
                endpoint: Endpoint::Goal,
                coord: Coord::new(1, 1),
                reason: EndpointIssue::Blocked
            }
        );

        // Equal but blocked.
        let c = Coord::new(1, 1);
        assert!(search(&mut g, c, c, &cfg).is_err());
    }

    #[test]
    fn invalid_config_is_an_error() {
        let mut g = Grid::new(2, 2).unwrap();
        let cfg = SearchConfig::four_way().with_bias(0.5);
        let err = search(&mut g, Coord::new(0, 0), Coord::new(1, 1), &cfg).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn enclosed_goal_fails_without_error() {
        let (mut g, s, t) = grid(
            "\
S....
..###
..#G#
..###",
        );
        let r = search(&mut g, s, t, &SearchConfig::eight_way()).unwrap();
        assert_eq!(r.status, SearchStatus::Failed);
        assert!(r.path.is_empty());
        assert_eq!(r.cost, None);
        // Every reachable free cell was explored.
        assert_eq!(r.closed_set.len(), 5 + 2 + 2 + 2);
        assert!(!r.closed_set.contains(&t));
    }

    #[test]
    fn path_avoids_obstacles() {
        let (mut g, s, t) = grid(
            "\
S.#..
..#..
..#.G
.....",
        );
        let cfg = SearchConfig::four_way();
        let r = search(&mut g, s, t, &cfg).unwrap();
        assert!(r.is_success());
        for c in &r.path {
            assert!(!g.is_blocked(*c).unwrap());
        }
        assert_eq!(path_cost(&r.path, cfg.topology, cfg.costs), r.cost);
        assert_eq!(r.cost, Some(80));
    }

    #[test]
    fn cells_keep_search_fields_after_run() {
        let mut g = Grid::new(3, 3).unwrap();
        let goal = Coord::new(2, 2);
        let r = search(&mut g, Coord::new(0, 0), goal, &SearchConfig::four_way()).unwrap();
        let cell = g.cell(goal).unwrap();
        assert_eq!(cell.g(), r.cost);
        assert_eq!(cell.h(), 0);
        let prev = r.path[r.path.len() - 2];
        assert_eq!(g.parent_of(goal).unwrap(), Some(prev));
        assert_eq!(g.parent_of(Coord::new(0, 0)).unwrap(), None);
    }

    #[test]
    fn stale_state_does_not_leak_between_runs() {
        let mut g = Grid::new(4, 4).unwrap();
        let cfg = SearchConfig::four_way();
        search(&mut g, Coord::new(0, 0), Coord::new(3, 3), &cfg).unwrap();
        // Second search from elsewhere: cells untouched by it must be fresh.
        let r = search(&mut g, Coord::new(3, 3), Coord::new(3, 2), &cfg).unwrap();
        assert_eq!(r.cost, Some(10));
        assert_eq!(g.cell(Coord::new(0, 0)).unwrap().g(), None);
        assert_eq!(g.parent_of(Coord::new(3, 3)).unwrap(), None);
    }

    #[test]
    fn recorder_sees_every_expansion() {
        let mut g = Grid::new(3, 3).unwrap();
        let mut rec = Recorder::new();
        let r = search_observed(
            &mut g,
            Coord::new(0, 0),
            Coord::new(2, 2),
            &SearchConfig::four_way(),
            &mut rec,
        )
        .unwrap();
        let steps = rec.steps();
        assert_eq!(steps.len(), r.expanded.len());
        let first = &steps[0];
        assert_eq!(first.step, 0);
        assert_eq!(first.current, Coord::new(0, 0));
        assert_eq!((first.g, first.h), (0, 40));
        assert!(first.open.is_empty());
        assert_eq!(first.closed, vec![Coord::new(0, 0)]);
        // Both neighbours of the start tie; one is popped, the other waits.
        assert_eq!(steps[1].open.len(), 1);
        let last = steps.last().unwrap();
        assert_eq!(last.current, Coord::new(2, 2));
        assert_eq!(last.closed, r.expanded);
        for s in steps {
            assert!(!s.open.contains(&s.current));
        }
    }

    #[test]
    fn observer_does_not_change_outcome() {
        let (mut g, s, t) = grid(
            "\
S.......
.##.#.#.
.#..#.#.
.#.##.#.
...#..#G",
        );
        let cfg = SearchConfig::eight_way();
        let headless = search(&mut g, s, t, &cfg).unwrap();
        assert!(headless.is_success());
        let observed = search_observed(&mut g, s, t, &cfg, &mut Recorder::new()).unwrap();
        assert_eq!(headless, observed);
    }

    #[test]
    fn observer_can_abort() {
        let mut g = Grid::new(6, 6).unwrap();
        let mut obs = from_fn(|snap: &Snapshot<'_>| {
            if snap.step == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        let r = search_observed(
            &mut g,
            Coord::new(0, 0),
            Coord::new(5, 5),
            &SearchConfig::four_way(),
            &mut obs,
        )
        .unwrap();
        assert_eq!(r.status, SearchStatus::Aborted);
        assert!(r.path.is_empty());
        assert_eq!(r.closed_set.len(), 3);
    }

    #[test]
    fn zero_heuristic_matches_astar_cost() {
        let (mut g, s, t) = grid(
            "\
S..#....
.#.#.##.
.#...#..
.####.#.
......#G",
        );
        for cfg in [SearchConfig::four_way(), SearchConfig::eight_way()] {
            let a = search(&mut g, s, t, &cfg).unwrap();
            let d = search(&mut g, s, t, &cfg.with_heuristic(Heuristic::Zero)).unwrap();
            assert_eq!(a.cost, d.cost);
            assert!(a.closed_set.len() <= d.closed_set.len());
        }
    }

    #[test]
    fn custom_step_costs() {
        let mut g = Grid::new(4, 4).unwrap();
        let cfg = SearchConfig::eight_way()
            .with_heuristic(Heuristic::Octile)
            .with_costs(StepCosts::new(2, 3));
        let r = search(&mut g, Coord::new(0, 0), Coord::new(3, 3), &cfg).unwrap();
        assert_eq!(r.cost, Some(9));
        assert_eq!(r.path.len(), 4);
        assert_eq!(cfg.topology, Topology::EightWay);
    }
    #[test]
    fn huge_step_costs_are_rejected_up_front() {
        let mut g = Grid::new(5, 5).unwrap();
        let costs = StepCosts::new(1_000_000_000, 1_000_000_000);
        let cfg = SearchConfig::four_way().with_costs(costs);
        assert!(cfg.validate().is_ok());
        let err = search(&mut g, Coord::new(0, 0), Coord::new(4, 4), &cfg).unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidConfig(ConfigError::CostOverflow {
                max_step: 1_000_000_000,
                dims: g.dims()
            })
        );
    }

    #[test]
    fn largest_fitting_step_costs_still_search() {
        // 16 cells: at most 15 steps per simple path.
        let step = (UNREACHABLE - 1) / 15;
        let mut g = Grid::new(4, 4).unwrap();
        let cfg = SearchConfig::eight_way().with_costs(StepCosts::new(step, step));
        let r = search(&mut g, Coord::new(0, 0), Coord::new(3, 3), &cfg).unwrap();
        assert_eq!(r.cost, Some(3 * step));
        assert_eq!(path_cost(&r.path, cfg.topology, cfg.costs), r.cost);
    }

    #[test]
    fn break_on_goal_expansion_still_succeeds() {
        let mut g = Grid::new(3, 3).unwrap();
        let goal = Coord::new(2, 2);
        let mut obs = from_fn(|snap: &Snapshot<'_>| {
            if snap.current == goal {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        let r = search_observed(
            &mut g,
            Coord::new(0, 0),
            goal,
            &SearchConfig::four_way(),
            &mut obs,
        )
        .unwrap();
        assert_eq!(r.status, SearchStatus::Succeeded);
        assert_eq!(r.cost, Some(40));
    }
}
