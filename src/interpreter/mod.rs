//! Multi-cursor grid interpreter.
//!
//! Programs are 2D grids of bytes. Every cursor carries an instruction
//! pointer that walks the grid and a data pointer that reads and writes it,
//! and all live cursors advance together, one instruction per tick.
//!
//! # Architecture
//!
//! - [`state`]: cursor records and the cursor set
//! - [`decode`]: byte → instruction mapping
//! - [`execute`]: per-cursor instruction semantics (pure)
//! - [`engine`]: the synchronized tick and the [`Interpreter`] handle
//! - [`error`]: load and tick errors
//!
//! # Example
//!
//! ```ignore
//! use refunge::interpreter::{Interpreter, Options};
//!
//! let mut interp = Interpreter::from_source(b"+X", Options::default())?;
//! interp.run(2)?;
//! assert_eq!(interp.get(0, 0), b'+'.wrapping_mul(2));
//! ```

pub mod decode;
pub mod engine;
pub mod error;
pub mod execute;
pub mod state;

// Engine types
pub use engine::{Features, Interpreter, Options, StepStatus, Tick};

// Error types
pub use error::{EngineError, LoadError};

// State types
pub use state::{Cursor, CursorId, CursorSet, Direction, Effect, Mode};

// Decoder types
pub use decode::{DataMove, Instruction, Mirror};
