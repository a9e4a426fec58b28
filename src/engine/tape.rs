//! Growable memory tape
//!
//! Zero-initialized byte cells plus a cursor. The cursor is always a valid
//! index into the current length; the tape never shrinks, and the only
//! resize trigger is the cursor reaching the end, which doubles the length.

use tracing::debug;

use super::RuntimeError;

pub struct Tape {
    cells: Vec<u8>,
    cursor: usize,
}

impl Tape {
    /// A fresh zeroed tape. Sizes below one cell are rounded up so the
    /// cursor invariant holds from the start.
    pub fn new(cells: usize) -> Self {
        Self {
            cells: vec![0; cells.max(1)],
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Value of the cell under the cursor.
    pub fn get(&self) -> u8 {
        self.cells[self.cursor]
    }

    /// Overwrite the cell under the cursor.
    pub fn set(&mut self, value: u8) {
        self.cells[self.cursor] = value;
    }

    /// Value at an arbitrary offset; zero past the grown region is
    /// unreachable (offsets beyond the length panic like slice indexing).
    pub fn cell(&self, offset: usize) -> u8 {
        self.cells[offset]
    }

    pub fn increment(&mut self) {
        self.cells[self.cursor] = self.cells[self.cursor].wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        self.cells[self.cursor] = self.cells[self.cursor].wrapping_sub(1);
    }

    pub fn move_left(&mut self) -> Result<(), RuntimeError> {
        if self.cursor == 0 {
            return Err(RuntimeError::CursorUnderflow);
        }
        self.cursor -= 1;
        Ok(())
    }

    /// Move right, doubling the tape when the cursor reaches the current
    /// length. Growth reserves up front so an allocation failure surfaces
    /// as `OutOfMemory` with the tape untouched.
    pub fn move_right(&mut self) -> Result<(), RuntimeError> {
        self.cursor += 1;
        if self.cursor >= self.cells.len() {
            let len = self.cells.len();
            let new_len = len.checked_mul(2).ok_or(RuntimeError::OutOfMemory)?;
            self.cells
                .try_reserve_exact(new_len - len)
                .map_err(|_| RuntimeError::OutOfMemory)?;
            self.cells.resize(new_len, 0);
            debug!(cells = new_len, "tape grown");
        }
        Ok(())
    }

    /// Zero every cell and return the cursor to the origin.
    pub fn clear(&mut self) {
        self.cells.fill(0);
        self.cursor = 0;
    }
}
