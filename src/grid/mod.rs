//! Growable two-dimensional program field.
//!
//! The grid is the single shared mutable resource of an interpreter. Every
//! cell holds one byte, which is both the instruction read by instruction
//! pointers and the datum read and written by data pointers.
//!
//! # Layout
//!
//! Storage is a flat row-major buffer sized by the *capacity*, which is always
//! at least as large as the logical *size* in both dimensions:
//!
//! ```text
//!        0        width      capacity.width
//!      0 ┌──────────┬─────────────┐
//!        │  logical │   zeroed    │
//! height ├──────────┘             │
//!        │         zeroed         │
//! cap.h  └────────────────────────┘
//! ```
//!
//! Capacity grows by doubling each dimension independently from a 16×16
//! baseline. Reallocation copies the old buffer row by row and zero-fills
//! everything new, so growth never disturbs existing content.
//!
//! # Example
//!
//! ```
//! use refunge::grid::Grid;
//!
//! let mut grid = Grid::new();
//! grid.ensure(3, 40).unwrap();
//! grid.set(2, 39, b'Y');
//! assert_eq!(grid.get(2, 39), b'Y');
//! assert_eq!(grid.get(0, 0), 0);
//! ```

mod source;

use thiserror::Error;

/// Smallest capacity allocated in either dimension.
pub const MIN_CAPACITY: usize = 16;

/// Width and height of a grid, in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl Size {
    /// Create a size from a width and height.
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of cells covered.
    pub const fn cells(self) -> usize {
        self.width * self.height
    }
}

/// A cell coordinate inside the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Row index, counted from the top.
    pub row: usize,
    /// Column index, counted from the left.
    pub col: usize,
}

impl Position {
    /// Create a position.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Errors raised while growing the grid.
///
/// When either is returned the grid is left exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The requested capacity does not fit in the address space.
    #[error("grid capacity overflow growing to {height}x{width}")]
    CapacityOverflow {
        /// Requested height.
        height: usize,
        /// Requested width.
        width: usize,
    },

    /// The allocator refused the new backing buffer.
    #[error("failed to allocate {bytes} bytes for a {height}x{width} grid")]
    Allocation {
        /// Buffer size that was requested.
        bytes: usize,
        /// Capacity height of the failed buffer.
        height: usize,
        /// Capacity width of the failed buffer.
        width: usize,
    },
}

/// Two-dimensional byte field with separate logical size and capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Row-major cells, `capacity.width` bytes per row.
    cells: Vec<u8>,
    /// Logical size visible to programs.
    size: Size,
    /// Allocated size of `cells`.
    capacity: Size,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Create a 1×1 grid holding a single zero cell.
    pub fn new() -> Self {
        Self {
            cells: vec![0; MIN_CAPACITY * MIN_CAPACITY],
            size: Size::new(1, 1),
            capacity: Size::new(MIN_CAPACITY, MIN_CAPACITY),
        }
    }

    /// Logical size.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Allocated size. Never smaller than [`Grid::size`].
    #[inline]
    pub fn capacity(&self) -> Size {
        self.capacity
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size.height && col < self.size.width,
            "cell ({}, {}) outside {}x{} grid",
            row,
            col,
            self.size.height,
            self.size.width
        );
        row * self.capacity.width + col
    }

    /// Check whether a coordinate lies inside the logical size.
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.size.height && col < self.size.width
    }

    /// Read a cell.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` lies outside the logical size.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[self.index(row, col)]
    }

    /// Write a cell.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` lies outside the logical size.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        let idx = self.index(row, col);
        self.cells[idx] = value;
    }

    /// Add `delta` to a cell, wrapping modulo 256.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` lies outside the logical size.
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, delta: u8) {
        let idx = self.index(row, col);
        self.cells[idx] = self.cells[idx].wrapping_add(delta);
    }

    /// Checked read; `None` outside the logical size.
    pub fn cell(&self, row: usize, col: usize) -> Option<u8> {
        if self.contains(row, col) {
            Some(self.cells[row * self.capacity.width + col])
        } else {
            None
        }
    }

    /// One logical row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row` is not below the logical height.
    pub fn row(&self, row: usize) -> &[u8] {
        assert!(row < self.size.height, "row {} outside grid of height {}", row, self.size.height);
        let start = row * self.capacity.width;
        &self.cells[start..start + self.size.width]
    }

    /// Iterate over the logical rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.size.height).map(move |row| self.row(row))
    }

    /// Grow the grid so it is at least `height` × `width`.
    ///
    /// Requests smaller than the current size are no-ops for that dimension;
    /// the grid never shrinks. Existing cells keep their values and new cells
    /// read as zero.
    pub fn ensure(&mut self, height: usize, width: usize) -> Result<(), GridError> {
        if width > self.capacity.width || height > self.capacity.height {
            self.reallocate(height, width)?;
        }

        self.size.width = self.size.width.max(width);
        self.size.height = self.size.height.max(height);
        Ok(())
    }

    fn reallocate(&mut self, height: usize, width: usize) -> Result<(), GridError> {
        let overflow = GridError::CapacityOverflow { height, width };
        let capacity = Size::new(
            grow_dimension(self.capacity.width, width).ok_or_else(|| overflow.clone())?,
            grow_dimension(self.capacity.height, height).ok_or_else(|| overflow.clone())?,
        );
        let bytes = capacity
            .width
            .checked_mul(capacity.height)
            .ok_or(overflow)?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(bytes)
            .map_err(|_| GridError::Allocation {
                bytes,
                height: capacity.height,
                width: capacity.width,
            })?;
        cells.resize(bytes, 0);

        let old_width = self.capacity.width;
        for row in 0..self.capacity.height {
            let src = row * old_width;
            let dst = row * capacity.width;
            cells[dst..dst + old_width].copy_from_slice(&self.cells[src..src + old_width]);
        }

        log::trace!(
            "grid capacity {}x{} -> {}x{}",
            self.capacity.height,
            self.capacity.width,
            capacity.height,
            capacity.width
        );

        self.cells = cells;
        self.capacity = capacity;
        Ok(())
    }
}

/// Double `current` (or start from the baseline) until it covers `required`.
fn grow_dimension(current: usize, required: usize) -> Option<usize> {
    let mut capacity = current.max(MIN_CAPACITY);
    while capacity < required {
        capacity = capacity.checked_mul(2)?;
    }
    Some(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_unit() {
        let grid = Grid::new();
        assert_eq!(grid.size(), Size::new(1, 1));
        assert_eq!(grid.capacity(), Size::new(16, 16));
        assert_eq!(grid.get(0, 0), 0);
    }

    #[test]
    fn test_ensure_within_capacity_keeps_buffer() {
        let mut grid = Grid::new();
        grid.ensure(10, 12).unwrap();
        assert_eq!(grid.size(), Size::new(12, 10));
        assert_eq!(grid.capacity(), Size::new(16, 16));
    }

    #[test]
    fn test_ensure_doubles_each_dimension_independently() {
        let mut grid = Grid::new();
        grid.ensure(17, 3).unwrap();
        assert_eq!(grid.capacity(), Size::new(16, 32));

        grid.ensure(1, 100).unwrap();
        assert_eq!(grid.capacity(), Size::new(128, 32));
        assert_eq!(grid.size(), Size::new(100, 17));
    }

    #[test]
    fn test_ensure_never_shrinks() {
        let mut grid = Grid::new();
        grid.ensure(20, 20).unwrap();
        grid.ensure(2, 2).unwrap();
        assert_eq!(grid.size(), Size::new(20, 20));
        assert_eq!(grid.capacity(), Size::new(32, 32));
    }

    #[test]
    fn test_growth_preserves_content_and_zero_fills() {
        let mut grid = Grid::new();
        grid.ensure(16, 16).unwrap();
        for row in 0..16 {
            for col in 0..16 {
                grid.set(row, col, (row * 16 + col) as u8 | 1);
            }
        }

        let steps = [(17, 16), (17, 40), (70, 40), (70, 41), (300, 5)];
        for &(height, width) in &steps {
            grid.ensure(height, width).unwrap();

            let size = grid.size();
            for row in 0..size.height {
                for col in 0..size.width {
                    let expected = if row < 16 && col < 16 {
                        (row * 16 + col) as u8 | 1
                    } else {
                        0
                    };
                    assert_eq!(grid.get(row, col), expected, "cell ({}, {})", row, col);
                }
            }
        }
    }

    #[test]
    fn test_add_wraps() {
        let mut grid = Grid::new();
        grid.set(0, 0, 200);
        grid.add(0, 0, 100);
        assert_eq!(grid.get(0, 0), 44);
        grid.add(0, 0, 44u8.wrapping_neg());
        assert_eq!(grid.get(0, 0), 0);
    }

    #[test]
    fn test_checked_cell_access() {
        let mut grid = Grid::new();
        grid.ensure(2, 3).unwrap();
        assert_eq!(grid.cell(1, 2), Some(0));
        assert_eq!(grid.cell(2, 0), None);
        assert_eq!(grid.cell(0, 3), None);
        // Inside capacity but outside the logical size.
        assert!(!grid.contains(5, 5));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_get_out_of_range_panics() {
        let grid = Grid::new();
        grid.get(0, 1);
    }

    #[test]
    fn test_rows_iterate_logical_width() {
        let mut grid = Grid::new();
        grid.ensure(2, 3).unwrap();
        grid.set(1, 2, b'x');
        let rows: Vec<&[u8]> = grid.rows().collect();
        assert_eq!(rows, vec![&[0u8, 0, 0][..], &[0u8, 0, b'x'][..]]);
    }

    #[test]
    fn test_capacity_overflow_leaves_grid_untouched() {
        let mut grid = Grid::new();
        grid.set(0, 0, 7);
        let err = grid.ensure(usize::MAX, usize::MAX).unwrap_err();
        assert!(matches!(err, GridError::CapacityOverflow { .. }));
        assert_eq!(grid.size(), Size::new(1, 1));
        assert_eq!(grid.get(0, 0), 7);
    }

    #[test]
    fn test_grow_dimension() {
        assert_eq!(grow_dimension(0, 1), Some(16));
        assert_eq!(grow_dimension(16, 16), Some(16));
        assert_eq!(grow_dimension(16, 33), Some(64));
        assert_eq!(grow_dimension(16, usize::MAX), None);
    }
}
