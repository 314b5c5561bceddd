//! Per-cursor execution state.
//!
//! A cursor is the unit of concurrent execution: an instruction pointer with
//! a direction, an independent data pointer, and the data mode that decides
//! what a data-advancing instruction does to the cell under the data pointer.

use crate::grid::Position;

/// Instruction pointer direction.
///
/// The discriminants are the wire encoding (0–3). Reflections are XOR masks
/// over that encoding, which is why the order matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// Towards increasing columns.
    #[default]
    Right = 0,
    /// Towards increasing rows.
    Down = 1,
    /// Towards decreasing columns.
    Left = 2,
    /// Towards decreasing rows.
    Up = 3,
}

impl Direction {
    /// All directions in encoding order.
    pub const ALL: [Direction; 4] = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];

    /// Decode a direction from the low two bits of `index`.
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Direction::Right,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Up,
        }
    }

    /// The 0–3 encoding.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Row and column step for one advance.
    #[inline]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Up => (-1, 0),
        }
    }

    /// Mirror on `\`: Right↔Down, Left↔Up.
    #[inline]
    pub const fn reflect_backslash(self) -> Self {
        Self::from_index(self.index() ^ 1)
    }

    /// Mirror on `/`: Right↔Up, Down↔Left.
    #[inline]
    pub const fn reflect_slash(self) -> Self {
        Self::from_index(self.index() ^ 3)
    }

    /// Mirror on `|`: Right↔Left, Down↔Up.
    #[inline]
    pub const fn reverse(self) -> Self {
        Self::from_index(self.index() ^ 2)
    }

    /// Arrow glyph used by dumps.
    pub const fn arrow(self) -> char {
        match self {
            Direction::Right => '>',
            Direction::Down => 'v',
            Direction::Left => '<',
            Direction::Up => '^',
        }
    }
}

/// Data access mode, persistent across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Data instructions only move the data pointer.
    #[default]
    None,
    /// Add the sampled cell value to the cell.
    Add,
    /// Subtract the sampled cell value from the cell.
    Subtract,
    /// Store the next input byte into the cell.
    Input,
    /// Offer the cell value as this tick's output byte.
    Output,
    /// Force the cell to zero (clear-mode feature only).
    Clear,
}

impl Mode {
    /// Short display name.
    pub const fn name(self) -> &'static str {
        match self {
            Mode::None => "none",
            Mode::Add => "add",
            Mode::Subtract => "sub",
            Mode::Input => "in",
            Mode::Output => "out",
            Mode::Clear => "clear",
        }
    }
}

/// A deferred grid mutation scheduled during evaluation.
///
/// Effects are committed after every cursor has been evaluated, so the
/// target is captured when the effect is scheduled. Output is not an effect:
/// it goes straight to the tick-level output latch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Nothing to apply.
    #[default]
    None,
    /// Add `delta` (modulo 256) to the target cell.
    Add {
        /// Cell to modify.
        target: Position,
        /// Value to add; subtraction is stored as its two's complement.
        delta: u8,
    },
    /// Store the tick's input byte into the target cell.
    Input {
        /// Cell to overwrite.
        target: Position,
    },
    /// Zero the target cell.
    Clear {
        /// Cell to zero.
        target: Position,
    },
}

impl Effect {
    /// Cell this effect applies to, if any.
    pub fn target(&self) -> Option<Position> {
        match *self {
            Effect::None => None,
            Effect::Add { target, .. } | Effect::Input { target } | Effect::Clear { target } => Some(target),
        }
    }
}

/// One cursor record.
///
/// `ip_row` is signed because an instruction pointer may step off the top of
/// the grid; such a cursor is removed at the end of the tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    /// Instruction pointer row. Never wraps.
    pub ip_row: isize,
    /// Instruction pointer column, always below the grid width.
    pub ip_col: usize,
    /// Instruction pointer direction.
    pub ip_dir: Direction,
    /// Data pointer row. Moving below the last row grows the grid.
    pub dp_row: usize,
    /// Data pointer column, always below the grid width.
    pub dp_col: usize,
    /// Current data mode.
    pub mode: Mode,
    /// Effect scheduled by the current tick.
    pub effect: Effect,
}

impl Cursor {
    /// A cursor at the origin heading right, mode none.
    pub const fn new() -> Self {
        Self {
            ip_row: 0,
            ip_col: 0,
            ip_dir: Direction::Right,
            dp_row: 0,
            dp_col: 0,
            mode: Mode::None,
            effect: Effect::None,
        }
    }

    /// Instruction pointer as a grid position, if its row is not negative.
    pub fn ip(&self) -> Option<Position> {
        usize::try_from(self.ip_row)
            .ok()
            .map(|row| Position::new(row, self.ip_col))
    }

    /// Data pointer as a grid position.
    #[inline]
    pub fn dp(&self) -> Position {
        Position::new(self.dp_row, self.dp_col)
    }

    /// Whether the instruction pointer row lies in `[0, height)`.
    #[inline]
    pub fn ip_in_rows(&self, height: usize) -> bool {
        self.ip().is_some_and(|ip| ip.row < height)
    }

    /// Step the instruction pointer once in its direction.
    ///
    /// The column wraps modulo `width`; the row does not.
    #[inline]
    pub fn advance_ip(&mut self, width: usize) {
        let (dr, dc) = self.ip_dir.delta();
        self.ip_row += dr;
        self.ip_col = wrap(self.ip_col, dc, width);
    }
}

/// Offset a column by `delta`, wrapping modulo `width`.
#[inline]
pub fn wrap(col: usize, delta: isize, width: usize) -> usize {
    debug_assert!(width > 0, "wrap on zero-width grid");
    (col as isize + delta).rem_euclid(width as isize) as usize
}
