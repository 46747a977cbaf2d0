use std::cmp::Ordering;
use std::collections::BinaryHeap;

use gridstar_core::{Cell, Range};

use crate::distance::{euclidean, step_cost};
use crate::path::Path;

/// Parent sentinel for cells without a predecessor.
pub(crate) const NO_PARENT: usize = usize::MAX;

// ---------------------------------------------------------------------------
// Internal node for priority-queue searches
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) g: f64,
    pub(crate) f: f64,
    pub(crate) parent: usize,
    pub(crate) open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: f64::INFINITY,
            f: f64::INFINITY,
            parent: NO_PARENT,
            open: false,
        }
    }
}

/// Heap entry, ordered so that `BinaryHeap` (a max-heap) pops the smallest
/// `(f, g, idx)` first. `idx` is row-major, so it orders like [`Cell`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f64,
    pub(crate) g: f64,
}

impl NodeRef {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then(self.g.total_cmp(&other.g))
            .then(self.idx.cmp(&other.idx))
    }
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key_cmp(self)
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// Lifecycle of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    /// Fresh state, nothing expanded yet.
    Initialized,
    /// At least one step taken, no result yet.
    Running,
    /// The goal was selected; the path is available.
    Found,
    /// The open set ran dry without reaching the goal.
    Exhausted,
}

impl SearchStatus {
    /// Whether the search has reached a final outcome.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Found | Self::Exhausted)
    }
}

/// The working set of a single A* run.
///
/// Scores and predecessor links are stored per cell of the grid bounds.
/// A cell never reached has no g-score (+∞), no f-score and no predecessor.
/// The start cell never has a predecessor.
///
/// Everything here is read-only from the outside and reflects the search as
/// of the last [`step`](crate::GridSearch::step). Clone the state to keep a
/// snapshot that outlives the next step.
#[derive(Clone, Debug)]
pub struct SearchState {
    bounds: Range,
    nodes: Vec<Node>,
    open: BinaryHeap<NodeRef>,
    open_count: usize,
    goal: Cell,
    current: Option<Cell>,
    status: SearchStatus,
    expanded: usize,
    path: Option<Path>,
    /// Number of times the open set was walked cell by cell.
    #[cfg(test)]
    pub(crate) open_scans: std::cell::Cell<usize>,
}

impl SearchState {
    /// Fresh state: only `start` is open, with g = 0.
    pub(crate) fn new(bounds: Range, start: Cell, goal: Cell) -> Self {
        let mut state = Self {
            bounds,
            nodes: vec![Node::default(); bounds.len()],
            open: BinaryHeap::new(),
            open_count: 0,
            goal,
            current: None,
            status: SearchStatus::Initialized,
            expanded: 0,
            path: None,
            #[cfg(test)]
            open_scans: std::cell::Cell::new(0),
        };
        if let Some(si) = bounds.index_of(start) {
            let f = euclidean(start, goal);
            let n = &mut state.nodes[si];
            n.g = 0.0;
            n.f = f;
            n.open = true;
            state.open_count = 1;
            state.open.push(NodeRef { idx: si, f, g: 0.0 });
        }
        state
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// The cell most recently selected for expansion.
    pub fn current(&self) -> Option<Cell> {
        self.current
    }

    /// Number of cells taken off the open set and expanded so far.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// The path, once the search is [`Found`](SearchStatus::Found).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Whether `c` is currently in the open set.
    pub fn is_open(&self, c: Cell) -> bool {
        self.node(c).is_some_and(|n| n.open)
    }

    /// Open cells in row-major order.
    ///
    /// This walks every cell of the grid; use [`open_len`](Self::open_len) or
    /// [`is_open`](Self::is_open) when the cells themselves are not needed.
    pub fn open_set(&self) -> impl Iterator<Item = Cell> + '_ {
        #[cfg(test)]
        self.open_scans.set(self.open_scans.get() + 1);
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.open)
            .map(|(i, _)| self.bounds.cell_at(i))
    }

    pub fn open_len(&self) -> usize {
        self.open_count
    }

    /// Predecessor of `c` on the cheapest path found so far.
    pub fn came_from(&self, c: Cell) -> Option<Cell> {
        self.node(c)
            .filter(|n| n.parent != NO_PARENT)
            .map(|n| self.bounds.cell_at(n.parent))
    }

    /// All `(cell, predecessor)` links in row-major order of `cell`.
    pub fn came_from_iter(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent != NO_PARENT)
            .map(|(i, n)| (self.bounds.cell_at(i), self.bounds.cell_at(n.parent)))
    }

    /// Cheapest known cost from the start to `c`; `None` means +∞.
    pub fn g_score(&self, c: Cell) -> Option<f64> {
        self.node(c).map(|n| n.g).filter(|g| g.is_finite())
    }

    /// g-score plus the heuristic to the goal; `None` means +∞.
    pub fn f_score(&self, c: Cell) -> Option<f64> {
        self.node(c).map(|n| n.f).filter(|f| f.is_finite())
    }

    /// All cells with a finite g-score, in row-major order.
    pub fn g_scores(&self) -> impl Iterator<Item = (Cell, f64)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.g.is_finite())
            .map(|(i, n)| (self.bounds.cell_at(i), n.g))
    }

    fn node(&self, c: Cell) -> Option<&Node> {
        self.bounds.index_of(c).map(|i| &self.nodes[i])
    }

    // -----------------------------------------------------------------------
    // Engine side
    // -----------------------------------------------------------------------

    pub(crate) fn set_status(&mut self, status: SearchStatus) {
        self.status = status;
    }

    pub(crate) fn set_current(&mut self, c: Cell) {
        self.current = Some(c);
    }

    /// The open cell with the smallest `(f, g, cell)` key, without removing it.
    ///
    /// Heap entries left behind by a later decrease of g, or by closing the
    /// node, are discarded on the way.
    pub(crate) fn peek_min(&mut self) -> Option<Cell> {
        while let Some(&top) = self.open.peek() {
            let n = &self.nodes[top.idx];
            if n.open && n.g.to_bits() == top.g.to_bits() {
                return Some(self.bounds.cell_at(top.idx));
            }
            self.open.pop();
        }
        None
    }

    /// Take `c` off the open set and count it as expanded.
    pub(crate) fn close(&mut self, c: Cell) {
        if let Some(i) = self.bounds.index_of(c) {
            if self.nodes[i].open {
                self.nodes[i].open = false;
                self.open_count -= 1;
            }
            self.expanded += 1;
        }
    }

    /// Try to improve the cost of reaching `to` through `from`.
    ///
    /// Returns whether `to` got a new g-score (and was put in the open set).
    pub(crate) fn relax(&mut self, from: Cell, to: Cell) -> bool {
        let (Some(fi), Some(ti)) = (self.bounds.index_of(from), self.bounds.index_of(to)) else {
            return false;
        };
        let tentative_g = self.nodes[fi].g + step_cost(from, to);

        let n = &mut self.nodes[ti];
        if tentative_g >= n.g {
            return false;
        }
        n.g = tentative_g;
        n.f = tentative_g + euclidean(to, self.goal);
        n.parent = fi;
        if !n.open {
            n.open = true;
            self.open_count += 1;
        }
        self.open.push(NodeRef {
            idx: ti,
            f: n.f,
            g: n.g,
        });
        true
    }

    /// Walk predecessor links back from the goal and store the path.
    pub(crate) fn finish(&mut self) -> Option<&Path> {
        let gi = self.bounds.index_of(self.goal)?;
        let mut cells = Vec::new();
        let mut ci = gi;
        while ci != NO_PARENT {
            cells.push(self.bounds.cell_at(ci));
            ci = self.nodes[ci].parent;
        }
        cells.reverse();
        self.path = Some(Path::new(cells));
        self.status = SearchStatus::Found;
        self.path.as_ref()
    }
}
