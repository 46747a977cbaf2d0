use gridstar_core::Cell;

/// The eight unit offsets, clockwise from north.
const DIRS: [Cell; 8] = [
    Cell::new(0, -1),
    Cell::new(1, -1),
    Cell::new(1, 0),
    Cell::new(1, 1),
    Cell::new(0, 1),
    Cell::new(-1, 1),
    Cell::new(-1, 0),
    Cell::new(-1, -1),
];

/// Cached neighbor computation helper.
///
/// Enumerates the 8-way neighbors of a cell into a reusable buffer, so
/// expanding many cells does not allocate.
pub struct Neighbors {
    buf: Vec<Cell>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    /// Create a new `Neighbors` helper.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Return the 8-directional neighbors of `c`, keeping only those for
    /// which `keep` returns `true`.
    ///
    /// Diagonal moves are allowed even when both orthogonal cells beside
    /// them are blocked.
    pub fn all(&mut self, c: Cell, keep: impl Fn(Cell) -> bool) -> &[Cell] {
        self.buf.clear();
        for d in DIRS {
            let n = c + d;
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}
