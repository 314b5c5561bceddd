//! Cursor state.
//!
//! This module holds the per-cursor records and the collection that owns
//! them:
//!
//! - [`Cursor`]: instruction pointer, data pointer, mode, and pending effect
//! - [`CursorSet`]: generational slot map of live cursors
//!
//! A cursor's [`Effect`] is reset at the start of every tick and set at most
//! once by the instruction it executes.

mod cursor;
mod cursor_set;

pub use cursor::{wrap, Cursor, Direction, Effect, Mode};
pub use cursor_set::{CursorId, CursorSet};
