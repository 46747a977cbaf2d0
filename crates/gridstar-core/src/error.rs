//! Validation errors for grid construction and editing.

use std::fmt;

use crate::geom::Cell;

/// What a cell is used for on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Start,
    Goal,
    Obstacle,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Goal => f.write_str("goal"),
            Self::Obstacle => f.write_str("obstacle"),
        }
    }
}

/// A grid that the engine refuses to search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidConfig {
    /// Width or height is not positive.
    #[error("invalid grid dimensions {width}x{height}")]
    Dimensions { width: i32, height: i32 },
    /// A start, goal or obstacle cell lies outside the grid.
    #[error("{role} {cell} is out of bounds")]
    OutOfBounds { role: Role, cell: Cell },
    /// Start or goal coincides with an obstacle.
    #[error("{role} {cell} is on an obstacle")]
    Blocked { role: Role, cell: Cell },
    /// Text map rows have different widths.
    #[error("map: row {row} has inconsistent width")]
    InconsistentRow { row: usize },
    /// Text map contains a character outside `#.SG*`.
    #[error("map: invalid character {ch:?} at {pos}")]
    InvalidChar { ch: char, pos: Cell },
    /// Text map has no start or no goal.
    #[error("map: missing {0}")]
    MissingEndpoint(Role),
    /// Text map has more than one start or goal.
    #[error("map: more than one {0}")]
    DuplicateEndpoint(Role),
}
