//! The searchable map: bounds, obstacles, start and goal.
//!
//! A [`Grid`] always satisfies its invariant: positive dimensions, every
//! obstacle in bounds, and start and goal in bounds and free. Constructors
//! and mutators reject anything that would break it, so the search engine
//! never has to re-check a grid it was handed.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{InvalidConfig, Role};
use crate::geom::{Cell, Range};

const OBSTACLE: char = '#';
const FREE: char = '.';
const START: char = 'S';
const GOAL: char = 'G';
const START_AND_GOAL: char = '*';

/// Plain-data description of a [`Grid`].
///
/// This is the configuration surface of the crate: build one in code or,
/// with the `serde` feature, deserialize it, then convert it with
/// `Grid::try_from`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub obstacles: Vec<Cell>,
    pub start: Cell,
    pub goal: Cell,
}

/// A rectangular map with obstacles, a start cell and a goal cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "GridConfig", into = "GridConfig")
)]
pub struct Grid {
    bounds: Range,
    obstacles: BTreeSet<Cell>,
    start: Cell,
    goal: Cell,
}

impl Grid {
    /// Create a grid of `width` × `height` cells with the origin at (0, 0).
    pub fn new(
        width: i32,
        height: i32,
        obstacles: impl IntoIterator<Item = Cell>,
        start: Cell,
        goal: Cell,
    ) -> Result<Self, InvalidConfig> {
        if width <= 0 || height <= 0 {
            return Err(InvalidConfig::Dimensions { width, height });
        }
        let bounds = Range::new(0, 0, width, height);
        let mut set = BTreeSet::new();
        for cell in obstacles {
            if !bounds.contains(cell) {
                return Err(InvalidConfig::OutOfBounds {
                    role: Role::Obstacle,
                    cell,
                });
            }
            set.insert(cell);
        }
        let grid = Self {
            bounds,
            obstacles: set,
            start,
            goal,
        };
        grid.check_endpoint(Role::Start, start)?;
        grid.check_endpoint(Role::Goal, goal)?;
        Ok(grid)
    }

    /// Parse a text map.
    ///
    /// `#` is an obstacle, `.` a free cell, `S` the start and `G` the goal.
    /// `*` marks a cell that is both start and goal.
    /// Rows are separated by newlines and must all have the same width.
    /// Whitespace around the whole text and around each row is ignored.
    pub fn parse(s: &str) -> Result<Self, InvalidConfig> {
        let mut width: Option<usize> = None;
        let mut height = 0;
        let mut obstacles = Vec::new();
        let mut start = None;
        let mut goal = None;

        for (y, line) in s.trim().lines().enumerate() {
            let mut w = 0;
            for (x, ch) in line.trim().chars().enumerate() {
                let (px, py) = map_extent(x, y)?;
                let pos = Cell::new(px, py);
                match ch {
                    OBSTACLE => obstacles.push(pos),
                    FREE => {}
                    START => set_once(&mut start, pos, Role::Start)?,
                    GOAL => set_once(&mut goal, pos, Role::Goal)?,
                    START_AND_GOAL => {
                        set_once(&mut start, pos, Role::Start)?;
                        set_once(&mut goal, pos, Role::Goal)?;
                    }
                    _ => return Err(InvalidConfig::InvalidChar { ch, pos }),
                }
                w += 1;
            }
            match width {
                None => width = Some(w),
                Some(expected) if expected != w => {
                    return Err(InvalidConfig::InconsistentRow { row: y });
                }
                Some(_) => {}
            }
            height = y + 1;
        }

        let start = start.ok_or(InvalidConfig::MissingEndpoint(Role::Start))?;
        let goal = goal.ok_or(InvalidConfig::MissingEndpoint(Role::Goal))?;
        let (width, height) = map_extent(width.unwrap_or(0), height)?;
        Self::new(width, height, obstacles, start, goal)
    }

    /// Returns the bounding range of the grid.
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Width of the grid.
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height of the grid.
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Whether the grid contains the given cell.
    pub fn contains(&self, c: Cell) -> bool {
        self.bounds.contains(c)
    }

    /// Whether `c` is an obstacle.
    pub fn is_obstacle(&self, c: Cell) -> bool {
        self.obstacles.contains(&c)
    }

    /// Whether a path may enter `c`: in bounds and not an obstacle.
    pub fn is_passable(&self, c: Cell) -> bool {
        self.contains(c) && !self.is_obstacle(c)
    }

    /// Obstacles in row-major order.
    pub fn obstacles(&self) -> impl Iterator<Item = Cell> + '_ {
        self.obstacles.iter().copied()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Mark `c` as an obstacle. Returns `false` if it already was one.
    ///
    /// Fails if `c` is out of bounds or is the start or goal.
    pub fn add_obstacle(&mut self, c: Cell) -> Result<bool, InvalidConfig> {
        if !self.contains(c) {
            return Err(InvalidConfig::OutOfBounds {
                role: Role::Obstacle,
                cell: c,
            });
        }
        if c == self.start {
            return Err(InvalidConfig::Blocked {
                role: Role::Start,
                cell: c,
            });
        }
        if c == self.goal {
            return Err(InvalidConfig::Blocked {
                role: Role::Goal,
                cell: c,
            });
        }
        log::trace!("obstacle added at {c}");
        Ok(self.obstacles.insert(c))
    }

    /// Clear the obstacle at `c`. Returns `false` if there was none.
    pub fn remove_obstacle(&mut self, c: Cell) -> bool {
        let removed = self.obstacles.remove(&c);
        if removed {
            log::trace!("obstacle removed at {c}");
        }
        removed
    }

    /// Flip `c` between obstacle and free. Returns whether `c` is now an obstacle.
    pub fn toggle_obstacle(&mut self, c: Cell) -> Result<bool, InvalidConfig> {
        if self.remove_obstacle(c) {
            return Ok(false);
        }
        self.add_obstacle(c)?;
        Ok(true)
    }

    /// Move the start to `c`, which must be in bounds and free.
    pub fn set_start(&mut self, c: Cell) -> Result<(), InvalidConfig> {
        self.check_endpoint(Role::Start, c)?;
        self.start = c;
        Ok(())
    }

    /// Move the goal to `c`, which must be in bounds and free.
    pub fn set_goal(&mut self, c: Cell) -> Result<(), InvalidConfig> {
        self.check_endpoint(Role::Goal, c)?;
        self.goal = c;
        Ok(())
    }

    /// Plain-data copy of this grid.
    pub fn to_config(&self) -> GridConfig {
        GridConfig {
            width: self.width(),
            height: self.height(),
            obstacles: self.obstacles().collect(),
            start: self.start,
            goal: self.goal,
        }
    }

    fn check_endpoint(&self, role: Role, cell: Cell) -> Result<(), InvalidConfig> {
        if !self.contains(cell) {
            return Err(InvalidConfig::OutOfBounds { role, cell });
        }
        if self.is_obstacle(cell) {
            return Err(InvalidConfig::Blocked { role, cell });
        }
        Ok(())
    }
}

/// Convert text-map sizes or positions, refusing anything past `i32::MAX`.
fn map_extent(width: usize, height: usize) -> Result<(i32, i32), InvalidConfig> {
    match (i32::try_from(width), i32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(InvalidConfig::Dimensions {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
        }),
    }
}

fn set_once(slot: &mut Option<Cell>, pos: Cell, role: Role) -> Result<(), InvalidConfig> {
    if slot.replace(pos).is_some() {
        return Err(InvalidConfig::DuplicateEndpoint(role));
    }
    Ok(())
}

impl TryFrom<GridConfig> for Grid {
    type Error = InvalidConfig;

    fn try_from(cfg: GridConfig) -> Result<Self, Self::Error> {
        Self::new(cfg.width, cfg.height, cfg.obstacles, cfg.start, cfg.goal)
    }
}

impl From<Grid> for GridConfig {
    fn from(grid: Grid) -> Self {
        grid.to_config()
    }
}

impl fmt::Display for Grid {
    /// Writes the grid in the text format read by [`Grid::parse`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in self.bounds.min.y..self.bounds.max.y {
            if y > self.bounds.min.y {
                f.write_str("\n")?;
            }
            for x in self.bounds.min.x..self.bounds.max.x {
                let c = Cell::new(x, y);
                let ch = if c == self.start && c == self.goal {
                    START_AND_GOAL
                } else if c == self.start {
                    START
                } else if c == self.goal {
                    GOAL
                } else if self.is_obstacle(c) {
                    OBSTACLE
                } else {
                    FREE
                };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLED: &str = "
        S.#..
        ..#..
        ..#.G
    ";

    #[test]
    fn new_valid() {
        let g = Grid::new(4, 3, [Cell::new(1, 1)], Cell::new(0, 0), Cell::new(3, 2)).unwrap();
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        assert!(g.is_obstacle(Cell::new(1, 1)));
        assert!(!g.is_passable(Cell::new(1, 1)));
        assert!(g.is_passable(Cell::new(0, 1)));
        assert!(!g.is_passable(Cell::new(4, 0)));
    }

    #[test]
    fn new_rejects_bad_dimensions() {
        let err = Grid::new(0, 3, [], Cell::ZERO, Cell::ZERO).unwrap_err();
        assert_eq!(
            err,
            InvalidConfig::Dimensions {
                width: 0,
                height: 3
            }
        );
        assert!(Grid::new(3, -1, [], Cell::ZERO, Cell::ZERO).is_err());
    }

    #[test]
    fn new_rejects_endpoint_out_of_bounds() {
        let err = Grid::new(3, 3, [], Cell::new(3, 0), Cell::ZERO).unwrap_err();
        assert_eq!(
            err,
            InvalidConfig::OutOfBounds {
                role: Role::Start,
                cell: Cell::new(3, 0)
            }
        );
        let err = Grid::new(3, 3, [], Cell::ZERO, Cell::new(0, -1)).unwrap_err();
        assert!(matches!(err, InvalidConfig::OutOfBounds { role: Role::Goal, .. }));
    }

    #[test]
    fn new_rejects_goal_on_obstacle() {
        let err = Grid::new(3, 3, [Cell::new(2, 2)], Cell::ZERO, Cell::new(2, 2)).unwrap_err();
        assert_eq!(
            err,
            InvalidConfig::Blocked {
                role: Role::Goal,
                cell: Cell::new(2, 2)
            }
        );
    }

    #[test]
    fn new_rejects_obstacle_out_of_bounds() {
        let err = Grid::new(3, 3, [Cell::new(5, 5)], Cell::ZERO, Cell::new(2, 2)).unwrap_err();
        assert!(matches!(err, InvalidConfig::OutOfBounds { role: Role::Obstacle, .. }));
    }

    #[test]
    fn start_may_equal_goal() {
        let g = Grid::new(1, 1, [], Cell::ZERO, Cell::ZERO).unwrap();
        assert_eq!(g.start(), g.goal());
    }

    #[test]
    fn shared_start_and_goal_round_trips_through_text() {
        let g = Grid::new(3, 1, [], Cell::new(1, 0), Cell::new(1, 0)).unwrap();
        assert_eq!(g.to_string(), ".*.");
        let back = Grid::parse(&g.to_string()).unwrap();
        assert_eq!(back, g);
        assert_eq!(back.start(), Cell::new(1, 0));
        assert_eq!(back.goal(), Cell::new(1, 0));
    }

    #[test]
    fn shared_marker_conflicts_with_other_endpoints() {
        assert_eq!(
            Grid::parse("*.S").unwrap_err(),
            InvalidConfig::DuplicateEndpoint(Role::Start)
        );
        assert_eq!(
            Grid::parse("G.*").unwrap_err(),
            InvalidConfig::DuplicateEndpoint(Role::Goal)
        );
    }

    #[test]
    fn oversized_text_map_extent_is_rejected() {
        assert_eq!(map_extent(4, 2), Ok((4, 2)));
        assert_eq!(
            map_extent(usize::MAX, 3).unwrap_err(),
            InvalidConfig::Dimensions {
                width: i32::MAX,
                height: 3
            }
        );
        assert!(map_extent(1, i32::MAX as usize + 1).is_err());
    }

    #[test]
    fn parse_and_display() {
        let g = Grid::parse(WALLED).unwrap();
        assert_eq!(g.width(), 5);
        assert_eq!(g.height(), 3);
        assert_eq!(g.start(), Cell::new(0, 0));
        assert_eq!(g.goal(), Cell::new(4, 2));
        assert_eq!(g.obstacle_count(), 3);
        assert_eq!(
            g.obstacles().collect::<Vec<_>>(),
            vec![Cell::new(2, 0), Cell::new(2, 1), Cell::new(2, 2)]
        );
        assert_eq!(g.to_string(), "S.#..\n..#..\n..#.G");
        assert_eq!(Grid::parse(&g.to_string()).unwrap(), g);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            Grid::parse("S..\n..").unwrap_err(),
            InvalidConfig::InconsistentRow { row: 1 }
        );
        assert_eq!(
            Grid::parse("S.x\n..G").unwrap_err(),
            InvalidConfig::InvalidChar {
                ch: 'x',
                pos: Cell::new(2, 0)
            }
        );
        assert_eq!(
            Grid::parse("S..\n...").unwrap_err(),
            InvalidConfig::MissingEndpoint(Role::Goal)
        );
        assert_eq!(
            Grid::parse("S.S\n..G").unwrap_err(),
            InvalidConfig::DuplicateEndpoint(Role::Start)
        );
        assert_eq!(
            Grid::parse("").unwrap_err(),
            InvalidConfig::MissingEndpoint(Role::Start)
        );
    }

    #[test]
    fn edit_obstacles() {
        let mut g = Grid::parse(WALLED).unwrap();
        assert_eq!(g.add_obstacle(Cell::new(1, 1)), Ok(true));
        assert_eq!(g.add_obstacle(Cell::new(1, 1)), Ok(false));
        assert!(g.remove_obstacle(Cell::new(1, 1)));
        assert!(!g.remove_obstacle(Cell::new(1, 1)));

        assert_eq!(g.toggle_obstacle(Cell::new(2, 1)), Ok(false));
        assert!(g.is_passable(Cell::new(2, 1)));
        assert_eq!(g.toggle_obstacle(Cell::new(2, 1)), Ok(true));
        assert!(g.is_obstacle(Cell::new(2, 1)));
    }

    #[test]
    fn edits_keep_invariant() {
        let mut g = Grid::parse(WALLED).unwrap();
        assert!(matches!(
            g.add_obstacle(g.start()),
            Err(InvalidConfig::Blocked { role: Role::Start, .. })
        ));
        assert!(matches!(
            g.toggle_obstacle(g.goal()),
            Err(InvalidConfig::Blocked { role: Role::Goal, .. })
        ));
        assert!(matches!(
            g.add_obstacle(Cell::new(9, 0)),
            Err(InvalidConfig::OutOfBounds { .. })
        ));
        assert!(g.set_goal(Cell::new(2, 0)).is_err());
        assert_eq!(g.goal(), Cell::new(4, 2));
        g.set_goal(Cell::new(3, 0)).unwrap();
        g.set_start(Cell::new(1, 2)).unwrap();
        assert_eq!(g.goal(), Cell::new(3, 0));
        assert_eq!(g.start(), Cell::new(1, 2));
        assert!(Grid::try_from(g.to_config()).is_ok());
    }

    #[test]
    fn config_round_trip() {
        let g = Grid::parse(WALLED).unwrap();
        let cfg = g.to_config();
        assert_eq!(cfg.width, 5);
        assert_eq!(cfg.obstacles.len(), 3);
        assert_eq!(Grid::try_from(cfg).unwrap(), g);

        let bad = GridConfig {
            width: 2,
            height: 2,
            obstacles: vec![Cell::new(1, 1)],
            start: Cell::ZERO,
            goal: Cell::new(1, 1),
        };
        assert!(Grid::try_from(bad).is_err());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_from_json() {
        let json = r#"{
            "width": 3,
            "height": 2,
            "obstacles": [{"x": 1, "y": 0}],
            "start": {"x": 0, "y": 0},
            "goal": {"x": 2, "y": 1}
        }"#;
        let g: Grid = serde_json::from_str(json).unwrap();
        assert_eq!(g.to_string(), "S#.\n..G");
    }

    #[test]
    fn grid_json_round_trip() {
        let g = Grid::parse("S#.\n..G").unwrap();
        let json = serde_json::to_string(&g).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn invalid_json_grid_is_rejected() {
        let json = r#"{"width": 2, "height": 2, "start": {"x": 0, "y": 0}, "goal": {"x": 5, "y": 0}}"#;
        assert!(serde_json::from_str::<Grid>(json).is_err());
    }
}
