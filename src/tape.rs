use crate::error::InterpreterError;

/// Default number of cells on the tape.
pub const TAPE_CAPACITY: usize = 30_000;

/// Fixed-capacity memory tape with a single data pointer.
///
/// The pointer is clamped at the left edge and refuses to move past the
/// right edge; the caller decides what a refused move means.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Tape {
    /// Create a zeroed tape with `capacity` cells. A zero capacity is bumped to one cell.
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![0; capacity.max(1)],
            pointer: 0,
        }
    }

    /// Create a zeroed tape with `capacity` cells, failing instead of aborting
    /// when the cells cannot be allocated. A zero capacity is rejected.
    pub fn try_new(capacity: usize) -> Result<Self, InterpreterError> {
        let fail = InterpreterError::TapeAllocation { capacity };
        if capacity == 0 {
            return Err(fail);
        }
        let mut cells = Vec::new();
        cells.try_reserve_exact(capacity).map_err(|_| fail)?;
        cells.resize(capacity, 0);
        Ok(Self { cells, pointer: 0 })
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Value of the cell under the pointer.
    pub fn current(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn set_current(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    pub fn increment(&mut self) -> u8 {
        let after = self.current().wrapping_add(1);
        self.set_current(after);
        after
    }

    pub fn decrement(&mut self) -> u8 {
        let after = self.current().wrapping_sub(1);
        self.set_current(after);
        after
    }

    /// Move right. Returns `false` and leaves the pointer alone at the last cell.
    pub fn move_right(&mut self) -> bool {
        if self.pointer + 1 >= self.cells.len() {
            return false;
        }
        self.pointer += 1;
        true
    }

    /// Move left, clamping at cell 0.
    pub fn move_left(&mut self) {
        self.pointer = self.pointer.saturating_sub(1);
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(TAPE_CAPACITY)
    }
}
