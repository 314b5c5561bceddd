//! refunge library
//!
//! Execution engine for a two-dimensional, torus-wrapped grid language in
//! which any number of cursors run in lock-step over one shared program.
//!
//! - [`grid`]: growable byte grid and program loading
//! - [`interpreter`]: cursors, instruction semantics and the tick engine
//! - [`runner`]: driver loop over byte sources and sinks
//! - [`debug`]: headless debugger session and text dumps
//! - [`config`]: layered configuration

pub mod config;
pub mod debug;
pub mod grid;
pub mod interpreter;
pub mod runner;

pub use interpreter::{EngineError, Features, Interpreter, LoadError, Options, StepStatus, Tick};
