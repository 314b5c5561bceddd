//! Synchronized multi-cursor engine.
//!
//! The [`Interpreter`] owns the grid and the cursor set and advances every
//! live cursor by one instruction per [`Interpreter::step`].
//!
//! # Execution Model
//!
//! Cursors run "conceptually in parallel": all of them are evaluated against
//! the grid as it stood before the tick, then their effects are committed in
//! fixed phases (input, add/subtract, clear). Adds commute, clears are
//! idempotent, and conflicting output samples block each other, so the
//! order cursors are stored in never changes the result.
//!
//! # Example
//!
//! ```ignore
//! use refunge::interpreter::{Interpreter, Options};
//!
//! let mut interp = Interpreter::from_source(b"?X!X", Options::default())?;
//!
//! interp.step(None)?;              // `?` selects input mode
//! let tick = interp.step(Some(b'A'))?;  // `X` stores the byte
//! assert!(tick.output.is_none());
//! ```

mod interpreter;
mod options;
mod tick;

pub use interpreter::Interpreter;
pub use options::{Features, Options};
pub use tick::{StepStatus, Tick};
