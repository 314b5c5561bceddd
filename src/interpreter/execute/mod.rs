//! Instruction semantics.
//!
//! [`execute`] is a pure function from a cursor and a read-only view of the
//! grid to the cursor's next state. It never writes to the grid: data
//! mutations come back as an [`Effect`] on the cursor, output samples come
//! back separately, and a fork comes back as a second cursor. The step
//! engine commits all of that after every cursor has been evaluated.
//!
//! # Per-instruction behavior
//!
//! - Data instructions sample the cell under the data pointer, move the
//!   pointer, and aim the mode's effect at the cell it lands on. `X` does not
//!   move, so its effect applies to the sampled cell itself. `^` on data row
//!   0 terminates the cursor instead.
//! - Mode instructions only change the mode (`*` only with
//!   [`Features::CLEAR_MODE`]).
//! - Mirrors change direction; `#` and a taken `@` add one extra advance.
//! - `Y` forks: the child turns `dir ^ 1` and steps once immediately, the
//!   parent turns `dir ^ 3`.
//!
//! Every surviving cursor then takes the standard one-cell advance.

use crate::grid::{Grid, Position};

use super::decode::{DataMove, Instruction};
use super::engine::Features;
use super::state::{wrap, Cursor, Effect, Mode};

/// Result of evaluating one cursor for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// The cursor's next state, or `None` if it terminated.
    pub cursor: Option<Cursor>,
    /// A cursor spawned by `Y`, already advanced past the fork.
    pub fork: Option<Cursor>,
    /// Byte offered to the tick's output latch.
    pub output: Option<u8>,
}

impl Outcome {
    fn terminated() -> Self {
        Self::default()
    }
}

/// Evaluate the instruction under `cursor`'s instruction pointer.
///
/// The instruction pointer must lie inside the grid; the step engine culls
/// cursors that leave it before they are evaluated again.
pub fn execute(grid: &Grid, cursor: &Cursor, features: Features) -> Outcome {
    let width = grid.size().width;
    let mut next = *cursor;
    next.effect = Effect::None;

    let mut output = None;
    let mut fork = None;

    match Instruction::decode(grid.get(ip_row(cursor), cursor.ip_col)) {
        Instruction::Data(motion) => {
            if motion == DataMove::Up && cursor.dp_row == 0 {
                return Outcome::terminated();
            }

            match motion {
                DataMove::Right => next.dp_col = wrap(next.dp_col, 1, width),
                DataMove::Left => next.dp_col = wrap(next.dp_col, -1, width),
                DataMove::Down => next.dp_row += 1,
                DataMove::Up => next.dp_row -= 1,
                DataMove::Stay => {}
            }

            // `v` may land below the last row; the engine grows the grid
            // before any effect is committed.
            let (effect, sample) = schedule(grid, cursor, next.dp());
            next.effect = effect;
            output = sample;
        }

        Instruction::SetMode(Mode::Clear) => {
            if features.contains(Features::CLEAR_MODE) {
                next.mode = Mode::Clear;
            }
        }
        Instruction::SetMode(mode) => next.mode = mode,

        Instruction::Reflect(mirror) => next.ip_dir = mirror.apply(next.ip_dir),

        Instruction::Skip => next.advance_ip(width),
        Instruction::SkipIfZero => {
            if grid.get(cursor.dp_row, cursor.dp_col) == 0 {
                next.advance_ip(width);
            }
        }

        Instruction::Fork => {
            let mut child = next;
            child.ip_dir = next.ip_dir.reflect_backslash();
            child.advance_ip(width);
            next.ip_dir = next.ip_dir.reflect_slash();
            fork = Some(child);
        }

        Instruction::Nop => {}
    }

    next.advance_ip(width);

    Outcome {
        cursor: Some(next),
        fork,
        output,
    }
}

/// Effect on `target` and output sample for a data instruction under the
/// cursor's mode. The value comes from the cell under the data pointer as it
/// stood before the instruction.
fn schedule(grid: &Grid, cursor: &Cursor, target: Position) -> (Effect, Option<u8>) {
    let value = grid.get(cursor.dp_row, cursor.dp_col);

    match cursor.mode {
        Mode::None => (Effect::None, None),
        Mode::Add => (Effect::Add { target, delta: value }, None),
        Mode::Subtract => (
            Effect::Add {
                target,
                delta: value.wrapping_neg(),
            },
            None,
        ),
        Mode::Input => (Effect::Input { target }, None),
        Mode::Output => (Effect::None, Some(value)),
        Mode::Clear => (Effect::Clear { target }, None),
    }
}

/// Whether `cursor` will consume an input byte on its next tick.
///
/// True when the mode is input and the instruction under the instruction
/// pointer is a data instruction that will actually execute; `^` on data row
/// 0 terminates the cursor rather than reading.
pub fn needs_input(grid: &Grid, cursor: &Cursor) -> bool {
    if cursor.mode != Mode::Input {
        return false;
    }

    let Some(ip) = cursor.ip() else {
        return false;
    };

    match grid.cell(ip.row, ip.col).map(Instruction::decode) {
        Some(Instruction::Data(DataMove::Up)) => cursor.dp_row != 0,
        Some(Instruction::Data(_)) => true,
        _ => false,
    }
}

#[inline]
fn ip_row(cursor: &Cursor) -> usize {
    debug_assert!(cursor.ip_row >= 0, "evaluating cursor above the grid");
    cursor.ip_row as usize
}
