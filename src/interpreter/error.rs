//! Interpreter error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::grid::GridError;

/// Errors building an interpreter from a program.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The program file could not be read.
    #[error("could not read program {}", path.display())]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The grid could not be grown to hold the program.
    #[error("program does not fit in memory")]
    Grid(#[from] GridError),
}

/// Errors raised by a tick.
///
/// A tick that fails has not changed the interpreter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The grid could not grow to follow a descending data pointer.
    #[error("tick {tick}: grid growth failed")]
    Grid {
        /// Index of the tick that failed, counted from 0.
        tick: u64,
        /// Growth failure.
        #[source]
        source: GridError,
    },
}
