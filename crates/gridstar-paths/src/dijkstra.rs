use std::collections::BinaryHeap;

use gridstar_core::{Cell, Grid, Range};

use crate::distance::step_cost;
use crate::neighbors::Neighbors;
use crate::state::NodeRef;

/// Cheapest 8-way travel cost from one source to every reachable cell.
#[derive(Debug, Clone)]
pub struct CostMap {
    bounds: Range,
    source: Cell,
    costs: Vec<f64>,
}

impl CostMap {
    pub fn source(&self) -> Cell {
        self.source
    }

    /// Cost from the source to `c`, or `None` if `c` cannot be reached.
    pub fn cost(&self, c: Cell) -> Option<f64> {
        let i = self.bounds.index_of(c)?;
        Some(self.costs[i]).filter(|v| v.is_finite())
    }

    /// Reached cells and their costs, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, f64)> + '_ {
        self.costs
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| (self.bounds.cell_at(i), v))
    }

    /// Number of reached cells, the source included.
    pub fn reached(&self) -> usize {
        self.costs.iter().filter(|v| v.is_finite()).count()
    }
}

/// Uniform-cost search from `source` over the whole grid.
///
/// This expands everything reachable with no heuristic, so it is a slow but
/// independent check of what A* returns.
pub fn cost_map(grid: &Grid, source: Cell) -> CostMap {
    let bounds = grid.bounds();
    let mut costs = vec![f64::INFINITY; bounds.len()];
    let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();

    if let Some(si) = bounds.index_of(source).filter(|_| grid.is_passable(source)) {
        costs[si] = 0.0;
        open.push(NodeRef {
            idx: si,
            f: 0.0,
            g: 0.0,
        });
    }

    let mut nbrs = Neighbors::new();
    while let Some(current) = open.pop() {
        let ci = current.idx;
        // Skip stale entries.
        if current.g > costs[ci] {
            continue;
        }
        let cp = bounds.cell_at(ci);
        for &np in nbrs.all(cp, |c| grid.is_passable(c)) {
            let Some(ni) = bounds.index_of(np) else {
                continue;
            };
            let tentative = current.g + step_cost(cp, np);
            if tentative >= costs[ni] {
                continue;
            }
            costs[ni] = tentative;
            open.push(NodeRef {
                idx: ni,
                f: tentative,
                g: tentative,
            });
        }
    }

    CostMap {
        bounds,
        source,
        costs,
    }
}

/// Cost of the cheapest path from the grid's start to its goal, or `None`
/// if there is none.
pub fn shortest_cost(grid: &Grid) -> Option<f64> {
    cost_map(grid, grid.start()).cost(grid.goal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::SQRT_2;

    #[test]
    fn open_room() {
        let grid = Grid::new(3, 3, [], Cell::new(0, 0), Cell::new(2, 2)).unwrap();
        let m = cost_map(&grid, grid.start());
        assert_eq!(m.source(), Cell::new(0, 0));
        assert_eq!(m.reached(), 9);
        assert_eq!(m.cost(Cell::new(0, 0)), Some(0.0));
        assert_eq!(m.cost(Cell::new(2, 0)), Some(2.0));
        assert_eq!(m.cost(Cell::new(1, 1)), Some(SQRT_2));
        assert_eq!(m.cost(Cell::new(3, 3)), None);
        assert!((shortest_cost(&grid).unwrap() - 2.0 * SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn walled_off() {
        let grid = Grid::parse(
            "
            S#.
            .#.
            .#G
            ",
        )
        .unwrap();
        let m = cost_map(&grid, grid.start());
        assert_eq!(m.reached(), 3);
        assert!(m.iter().all(|(c, _)| c.x == 0));
        assert_eq!(shortest_cost(&grid), None);
    }

    #[test]
    fn squeezes_through_diagonal_gap() {
        let grid = Grid::parse(
            "
            S#.
            #.#
            .#G
            ",
        )
        .unwrap();
        assert!((shortest_cost(&grid).unwrap() - 2.0 * SQRT_2).abs() < 1e-9);
    }
}
