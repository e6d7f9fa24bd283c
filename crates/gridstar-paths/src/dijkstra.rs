use gridstar_core::{Coord, Dims};

use crate::grid::Grid;
use crate::neighbors::{Neighbors, Topology};
use crate::open_set::OpenSet;
use crate::policy::{Cost, StepCosts, UNREACHABLE};

/// Exact path costs from a set of sources, as computed by [`dijkstra_map`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostMap {
    dims: Dims,
    costs: Vec<Cost>,
}

impl CostMap {
    /// Grid extents the map was computed for.
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Cost of the cheapest path from any source to `c`, or `None` if `c`
    /// is out of bounds, blocked, or was not reached within the cost limit.
    pub fn at(&self, c: Coord) -> Option<Cost> {
        let i = self.dims.index(c)?;
        (self.costs[i] != UNREACHABLE).then_some(self.costs[i])
    }

    /// All reached cells with their cost, in row-major order.
    pub fn reached(&self) -> impl Iterator<Item = (Coord, Cost)> + '_ {
        self.costs
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != UNREACHABLE)
            .map(|(i, &c)| (self.dims.coord(i), c))
    }
}

/// Compute a multi-source Dijkstra cost map over the unblocked cells of
/// `grid`.
///
/// Every valid, unblocked source starts at cost 0; other sources are
/// ignored. Expansion stops when the cumulative cost exceeds `max_cost`.
/// The grid's per-cell search fields are left untouched.
pub fn dijkstra_map(
    grid: &Grid,
    sources: &[Coord],
    topology: Topology,
    costs: StepCosts,
    max_cost: Cost,
) -> CostMap {
    let dims = grid.dims();
    let mut dist = vec![UNREACHABLE; dims.len()];
    let mut done = vec![false; dims.len()];
    let mut open = OpenSet::new();

    for &src in sources {
        if let Some(si) = dims.index(src) {
            if grid.cells[si].blocked || dist[si] == 0 {
                continue;
            }
            dist[si] = 0;
            open.push(si, 0, 0, 0.0);
        }
    }

    while let Some(current) = open.pop() {
        if !current.is_live(&dist, &done) {
            continue;
        }
        let ci = current.idx;
        done[ci] = true;

        for (np, mv) in Neighbors::new(dims.coord(ci), dims, topology) {
            let Some(ni) = dims.index(np) else {
                continue;
            };
            if grid.cells[ni].blocked || done[ni] {
                continue;
            }
            let tentative = current.g.saturating_add(costs.cost(mv));
            if tentative > max_cost || tentative >= dist[ni] {
                continue;
            }
            dist[ni] = tentative;
            open.push(ni, tentative, 0, f64::from(tentative));
        }
    }

    CostMap { dims, costs: dist }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridstar_core::Layout;

    #[test]
    fn open_grid_costs() {
        let g = Grid::new(3, 4).unwrap();
        let costs = StepCosts::default();
        let m4 = dijkstra_map(&g, &[Coord::new(0, 0)], Topology::FourWay, costs, UNREACHABLE);
        assert_eq!(m4.at(Coord::new(2, 3)), Some(50));
        let m8 = dijkstra_map(&g, &[Coord::new(0, 0)], Topology::EightWay, costs, UNREACHABLE);
        assert_eq!(m8.at(Coord::new(2, 3)), Some(14 * 2 + 10));
        assert_eq!(m8.reached().count(), 12);
    }

    #[test]
    fn blocked_cells_and_sources_are_skipped() {
        let l = Layout::parse("..#.\n..#.\n..#.").unwrap();
        let g = Grid::from_layout(&l);
        let m = dijkstra_map(
            &g,
            &[Coord::new(0, 0), Coord::new(0, 2), Coord::new(9, 9)],
            Topology::EightWay,
            StepCosts::default(),
            UNREACHABLE,
        );
        assert_eq!(m.at(Coord::new(0, 0)), Some(0));
        assert_eq!(m.at(Coord::new(0, 2)), None);
        assert_eq!(m.at(Coord::new(0, 3)), None);
        assert_eq!(m.reached().count(), 6);
    }

    #[test]
    fn multi_source_and_max_cost() {
        let g = Grid::new(1, 7).unwrap();
        let m = dijkstra_map(
            &g,
            &[Coord::new(0, 0), Coord::new(0, 6)],
            Topology::FourWay,
            StepCosts::default(),
            20,
        );
        assert_eq!(m.at(Coord::new(0, 1)), Some(10));
        assert_eq!(m.at(Coord::new(0, 5)), Some(10));
        assert_eq!(m.at(Coord::new(0, 2)), Some(20));
        assert_eq!(m.at(Coord::new(0, 3)), None);
    }
}
