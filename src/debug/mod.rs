//! Headless debugger support.
//!
//! This module provides what a debugger front-end needs from the engine:
//! - Snapshot of the loaded program and reset to it
//! - Cursor listing (IP, heading, DP, mode)
//! - Cell breakpoints
//! - Single, batched and fast-batched stepping
//! - Input queueing with optional blocking
//! - Plain-text grid and cursor dumps
//!
//! # Usage
//!
//! ```ignore
//! use refunge::config::Config;
//! use refunge::debug::{render_grid, Session};
//!
//! let mut session = Session::from_config(interp, Config::get());
//! session.toggle_breakpoint(2, 5);
//! session.fast_forward()?;
//! println!("{}", render_grid(session.interpreter().grid()));
//! ```

mod dump;
mod session;

pub use dump::{render_cell, render_cursors, render_grid};
pub use session::{cursor_views, Breakpoint, CursorView, Session, SessionStatus, DEFAULT_FAST_TICKS};
