//! A\* shortest-path search on 8-connected grids, observable step by step.
//!
//! Orthogonal moves cost 1 and diagonal moves cost √2. The heuristic is the
//! straight-line (Euclidean) distance to the goal, which never overestimates
//! on such a grid, so every path returned is cost-optimal.
//!
//! [`GridSearch`] owns a [`Grid`](gridstar_core::Grid) and one
//! [`SearchState`]. Callers either drive the search to its end with
//! [`GridSearch::run_to_completion`] or advance it one expansion at a time
//! with [`GridSearch::step`], reading the open set, predecessor links and
//! scores from [`GridSearch::state`] in between.
//!
//! # Frontier order
//!
//! The open cell with the lowest f-score is expanded first. Ties go to the
//! lower g-score, then to the cell that comes first in row-major order
//! (smaller `y`, then smaller `x`). Identical grids therefore always produce
//! identical paths.
//!
//! # Example
//!
//! ```
//! use gridstar_core::{Cell, Grid};
//! use gridstar_paths::{GridSearch, StepOutcome};
//!
//! let grid = Grid::parse("
//!     S.#
//!     ..#
//!     ..G
//! ").unwrap();
//! let mut search = GridSearch::from_grid(grid);
//! while let StepOutcome::InProgress { .. } = search.step() {}
//! let path = search.state().path().unwrap();
//! assert_eq!(path.cells().first(), Some(&Cell::new(0, 0)));
//! assert_eq!(path.cells().last(), Some(&Cell::new(2, 2)));
//! ```

mod dijkstra;
mod distance;
mod neighbors;
mod path;
mod search;
mod state;

pub use dijkstra::{CostMap, cost_map, shortest_cost};
pub use distance::{euclidean, octile, step_cost};
pub use neighbors::Neighbors;
pub use path::{Path, path_cost};
pub use search::{GridSearch, StepOutcome};
pub use state::{SearchState, SearchStatus};
