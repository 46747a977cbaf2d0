//! **gridstar-core** — map types for grid shortest-path search.
//!
//! This crate provides the value types shared by the search engine and its
//! callers: the [`Cell`] coordinate, the [`Range`] rectangle, and the
//! [`Grid`] map (bounds, obstacles, start and goal) together with its
//! validation errors.

pub mod error;
pub mod geom;
pub mod grid;

pub use error::{InvalidConfig, Role};
pub use geom::{Cell, Range, RangeIter};
pub use grid::{Grid, GridConfig};
