//! Plain-text grid and cursor dumps.

use std::fmt::Write;

use crate::grid::Grid;

use super::session::CursorView;

/// Width of one rendered cell, in characters.
const CELL_WIDTH: usize = 2;

/// Render one cell: the character if printable ASCII, else two hex digits.
pub fn render_cell(byte: u8) -> String {
    if (32..127).contains(&byte) {
        format!("{:<width$}", byte as char, width = CELL_WIDTH)
    } else {
        format!("{:02X}", byte)
    }
}

/// Render the logical grid, one line per row.
///
/// Cells are separated by a space; trailing whitespace is trimmed.
pub fn render_grid(grid: &Grid) -> String {
    let mut out = String::new();
    for row in grid.rows() {
        let line: Vec<String> = row.iter().map(|&b| render_cell(b)).collect();
        out.push_str(line.join(" ").trim_end());
        out.push('\n');
    }
    out
}

/// Render one line per cursor: index, IP, heading, DP and mode.
pub fn render_cursors(cursors: &[CursorView]) -> String {
    let mut out = String::new();
    for view in cursors {
        let _ = writeln!(
            out,
            "#{:<3} ip ({},{}) {}  dp ({},{})  {}",
            view.index,
            view.ip.row,
            view.ip.col,
            view.dir.arrow(),
            view.dp.row,
            view.dp.col,
            view.mode.name()
        );
    }
    out
}
