use gridstar_core::Cell;

use crate::distance::step_cost;

/// A path from start to goal, both inclusive, with its total move cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    cells: Vec<Cell>,
    cost: f64,
}

impl Path {
    /// Build a path from consecutive cells, summing the move costs.
    pub fn new(cells: Vec<Cell>) -> Self {
        let cost = path_cost(&cells);
        Self { cells, cost }
    }

    /// The cells in order, from start to goal.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Sum of the move costs along the path.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of cells, endpoints included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

/// Total cost of walking `cells` in order, using [`step_cost`] for each move.
pub fn path_cost(cells: &[Cell]) -> f64 {
    cells.windows(2).map(|w| step_cost(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::SQRT_2;

    #[test]
    fn single_cell_costs_nothing() {
        let p = Path::new(vec![Cell::new(3, 3)]);
        assert_eq!(p.len(), 1);
        assert_eq!(p.cost(), 0.0);
    }

    #[test]
    fn mixed_moves() {
        let cells = vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 1), Cell::new(2, 2)];
        let p = Path::new(cells.clone());
        assert!((p.cost() - (2.0 + SQRT_2)).abs() < 1e-9);
        assert_eq!(p.into_cells(), cells);
    }
}
