//! Building a grid from program text.

use super::{Grid, GridError};

impl Grid {
    /// Lay out program text as a grid.
    ///
    /// Each line becomes a row; `\n` advances to the next row and resets the
    /// column. All other bytes are stored verbatim, except `nul`, which is
    /// stored as 0 so program authors can spell a NUL cell visibly.
    ///
    /// The width ends up as the longest line (at least 1). Rows are only
    /// materialized by the cells written into them, so a trailing newline
    /// does not add an empty row.
    pub fn from_source(source: &[u8], nul: Option<u8>) -> Result<Self, GridError> {
        let mut grid = Grid::new();
        let (mut row, mut col) = (0usize, 0usize);

        for &byte in source {
            if byte == b'\n' {
                row += 1;
                col = 0;
                continue;
            }

            grid.ensure(row + 1, col + 1)?;
            let value = if Some(byte) == nul { 0 } else { byte };
            grid.set(row, col, value);
            col += 1;
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::{Grid, Size};

    #[test]
    fn test_empty_source_is_unit_grid() {
        let grid = Grid::from_source(b"", None).unwrap();
        assert_eq!(grid.size(), Size::new(1, 1));
        assert_eq!(grid.get(0, 0), 0);
    }

    #[test]
    fn test_width_is_longest_line() {
        let grid = Grid::from_source(b"ab\nabcde\nc", None).unwrap();
        assert_eq!(grid.size(), Size::new(5, 3));
        assert_eq!(grid.row(0), b"ab\0\0\0");
        assert_eq!(grid.row(1), b"abcde");
        assert_eq!(grid.row(2), b"c\0\0\0\0");
    }

    #[test]
    fn test_trailing_newline_adds_no_row() {
        let grid = Grid::from_source(b"?!\n  \n", None).unwrap();
        assert_eq!(grid.size(), Size::new(2, 2));
    }

    #[test]
    fn test_blank_line_between_rows_is_kept() {
        let grid = Grid::from_source(b"v\n\n^", None).unwrap();
        assert_eq!(grid.size(), Size::new(1, 3));
        assert_eq!(grid.get(1, 0), 0);
        assert_eq!(grid.get(2, 0), b'^');
    }

    #[test]
    fn test_nul_substitution() {
        let grid = Grid::from_source(b"a.b.", Some(b'.')).unwrap();
        assert_eq!(grid.row(0), b"a\0b\0");

        let grid = Grid::from_source(b"a.b.", None).unwrap();
        assert_eq!(grid.row(0), b"a.b.");
    }

    #[test]
    fn test_wide_program_grows_capacity() {
        let line = vec![b'>'; 40];
        let grid = Grid::from_source(&line, None).unwrap();
        assert_eq!(grid.size(), Size::new(40, 1));
        assert_eq!(grid.capacity().width, 64);
    }
}
