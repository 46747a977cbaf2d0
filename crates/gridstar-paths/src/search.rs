use gridstar_core::{Cell, Grid, InvalidConfig};

use crate::neighbors::Neighbors;
use crate::path::Path;
use crate::state::{SearchState, SearchStatus};

/// What a single [`GridSearch::step`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// `current` was expanded; `open` is the open set afterwards, in
    /// row-major order.
    InProgress { current: Cell, open: Vec<Cell> },
    /// The goal was reached.
    Found(Path),
    /// No path exists.
    Exhausted,
}

impl StepOutcome {
    /// Whether this outcome ends the search.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress { .. })
    }
}

/// Result of one pop-and-expand iteration, before any snapshot is taken.
enum Advance {
    Expanded(Cell),
    Found,
    Exhausted,
}

/// A* search over a [`Grid`] with 8-way movement.
///
/// The engine owns its grid and the [`SearchState`] of the current run. The
/// state starts fresh on construction, on [`reset`](Self::reset) and after
/// every grid edit, so an edit abandons any search in progress.
pub struct GridSearch {
    grid: Grid,
    state: SearchState,
    nbrs: Neighbors,
}

impl GridSearch {
    /// Build an engine for a `width` × `height` grid.
    ///
    /// Fails if the dimensions are not positive, if an obstacle is out of
    /// bounds, or if start or goal is out of bounds or on an obstacle.
    pub fn new(
        width: i32,
        height: i32,
        obstacles: impl IntoIterator<Item = Cell>,
        start: Cell,
        goal: Cell,
    ) -> Result<Self, InvalidConfig> {
        let grid = Grid::new(width, height, obstacles, start, goal)?;
        Ok(Self::from_grid(grid))
    }

    /// Build an engine for an already validated grid.
    pub fn from_grid(grid: Grid) -> Self {
        let state = fresh_state(&grid);
        Self {
            grid,
            state,
            nbrs: Neighbors::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Read-only view of the current run, valid until the next mutation.
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Give back the grid, dropping the search state.
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Discard the current run and start over from the stored grid.
    pub fn reset(&mut self) {
        self.state = fresh_state(&self.grid);
    }

    // -----------------------------------------------------------------------
    // Running
    // -----------------------------------------------------------------------

    /// Perform one iteration: select the best open cell and, unless it is
    /// the goal, expand it.
    ///
    /// After the search ends, further calls change nothing and return the
    /// same terminal outcome again.
    pub fn step(&mut self) -> StepOutcome {
        match self.advance() {
            Advance::Expanded(current) => StepOutcome::InProgress {
                current,
                open: self.state.open_set().collect(),
            },
            Advance::Found => self.found(),
            Advance::Exhausted => StepOutcome::Exhausted,
        }
    }

    /// Step until the search ends. Returns the path, or `None` if the goal
    /// cannot be reached.
    ///
    /// Continues the current run if it was already stepped; a finished run
    /// returns its result again without doing any work. No open-set snapshot
    /// is built along the way.
    pub fn run_to_completion(&mut self) -> Option<Path> {
        loop {
            match self.advance() {
                Advance::Expanded(_) => {}
                Advance::Found => return self.state.path().cloned(),
                Advance::Exhausted => return None,
            }
        }
    }

    fn advance(&mut self) -> Advance {
        match self.state.status() {
            SearchStatus::Found => return Advance::Found,
            SearchStatus::Exhausted => return Advance::Exhausted,
            SearchStatus::Initialized => {
                log::debug!(
                    "search started: {}x{} grid, {} obstacles, {} -> {}",
                    self.grid.width(),
                    self.grid.height(),
                    self.grid.obstacle_count(),
                    self.grid.start(),
                    self.grid.goal()
                );
                self.state.set_status(SearchStatus::Running);
            }
            SearchStatus::Running => {}
        }

        let Some(current) = self.state.peek_min() else {
            log::debug!(
                "no path from {} to {} after {} expansions",
                self.grid.start(),
                self.grid.goal(),
                self.state.expanded()
            );
            self.state.set_status(SearchStatus::Exhausted);
            return Advance::Exhausted;
        };
        self.state.set_current(current);

        if current == self.grid.goal() {
            let expanded = self.state.expanded();
            if let Some(path) = self.state.finish() {
                log::debug!(
                    "path found: {} cells, cost {:.3}, {expanded} expansions",
                    path.len(),
                    path.cost()
                );
            }
            return Advance::Found;
        }

        log::trace!(
            "expand {current} g={:.3} f={:.3}",
            self.state.g_score(current).unwrap_or(f64::INFINITY),
            self.state.f_score(current).unwrap_or(f64::INFINITY)
        );
        self.state.close(current);

        let grid = &self.grid;
        for &n in self.nbrs.all(current, |c| grid.is_passable(c)) {
            self.state.relax(current, n);
        }

        Advance::Expanded(current)
    }

    // -----------------------------------------------------------------------
    // Editing between searches
    // -----------------------------------------------------------------------

    /// Add an obstacle and restart the search. See [`Grid::add_obstacle`].
    pub fn add_obstacle(&mut self, c: Cell) -> Result<bool, InvalidConfig> {
        let added = self.grid.add_obstacle(c)?;
        self.reset();
        Ok(added)
    }

    /// Remove an obstacle and restart the search. See [`Grid::remove_obstacle`].
    pub fn remove_obstacle(&mut self, c: Cell) -> bool {
        let removed = self.grid.remove_obstacle(c);
        self.reset();
        removed
    }

    /// Flip an obstacle and restart the search. See [`Grid::toggle_obstacle`].
    pub fn toggle_obstacle(&mut self, c: Cell) -> Result<bool, InvalidConfig> {
        let now_blocked = self.grid.toggle_obstacle(c)?;
        self.reset();
        Ok(now_blocked)
    }

    /// Move the start and restart the search.
    pub fn set_start(&mut self, c: Cell) -> Result<(), InvalidConfig> {
        self.grid.set_start(c)?;
        self.reset();
        Ok(())
    }

    /// Move the goal and restart the search.
    pub fn set_goal(&mut self, c: Cell) -> Result<(), InvalidConfig> {
        self.grid.set_goal(c)?;
        self.reset();
        Ok(())
    }

    fn found(&self) -> StepOutcome {
        match self.state.path() {
            Some(path) => StepOutcome::Found(path.clone()),
            None => StepOutcome::Exhausted,
        }
    }
}

fn fresh_state(grid: &Grid) -> SearchState {
    SearchState::new(grid.bounds(), grid.start(), grid.goal())
}
