use std::f64::consts::SQRT_2;

use gridstar_core::Cell;

/// Straight-line (L2) distance between two cells. This is the A* heuristic.
#[inline]
pub fn euclidean(a: Cell, b: Cell) -> f64 {
    let dx = f64::from(a.x - b.x);
    let dy = f64::from(a.y - b.y);
    dx.hypot(dy)
}

/// Octile distance: the cost of the cheapest 8-way path between two cells
/// on a grid without obstacles.
#[inline]
pub fn octile(a: Cell, b: Cell) -> f64 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let diag = dx.min(dy);
    let straight = dx.max(dy) - diag;
    f64::from(diag) * SQRT_2 + f64::from(straight)
}

/// Cost of one move between adjacent cells: 1 orthogonally, √2 diagonally.
#[inline]
pub fn step_cost(from: Cell, to: Cell) -> f64 {
    if from.is_diagonal_to(to) { SQRT_2 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn step_costs() {
        let c = Cell::new(2, 2);
        assert_eq!(step_cost(c, Cell::new(3, 2)), 1.0);
        assert_eq!(step_cost(c, Cell::new(2, 1)), 1.0);
        assert_eq!(step_cost(c, Cell::new(1, 1)), SQRT_2);
        assert_eq!(step_cost(c, Cell::new(3, 3)), SQRT_2);
    }

    #[test]
    fn euclidean_distance() {
        assert_eq!(euclidean(Cell::new(0, 0), Cell::new(3, 4)), 5.0);
        assert_eq!(euclidean(Cell::new(1, 1), Cell::new(1, 1)), 0.0);
        assert!((euclidean(Cell::new(0, 0), Cell::new(1, 1)) - SQRT_2).abs() < EPS);
    }

    #[test]
    fn octile_distance() {
        assert_eq!(octile(Cell::new(0, 0), Cell::new(3, 0)), 3.0);
        assert!((octile(Cell::new(0, 0), Cell::new(3, 1)) - (2.0 + SQRT_2)).abs() < EPS);
        assert!((octile(Cell::new(4, 4), Cell::new(0, 0)) - 4.0 * SQRT_2).abs() < EPS);
    }

    #[test]
    fn euclidean_never_exceeds_octile() {
        for x in -6..=6 {
            for y in -6..=6 {
                let (a, b) = (Cell::ZERO, Cell::new(x, y));
                assert!(euclidean(a, b) <= octile(a, b) + EPS, "{a} -> {b}");
            }
        }
    }
}
