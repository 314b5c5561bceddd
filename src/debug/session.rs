//! Interactive debug session.

use std::collections::VecDeque;

use crate::config::Config;
use crate::grid::Position;
use crate::interpreter::{Direction, EngineError, Interpreter, Mode};

/// Default number of ticks per fast batch.
pub const DEFAULT_FAST_TICKS: u64 = 10_000;

/// Breakpoint on a grid cell.
///
/// A batch stops after any tick that leaves a cursor's instruction pointer
/// on an enabled breakpoint cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    /// Cell row.
    pub row: usize,
    /// Cell column.
    pub col: usize,
    /// Whether this breakpoint is enabled.
    pub enabled: bool,
}

impl Breakpoint {
    /// Create a new breakpoint.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            enabled: true,
        }
    }
}

/// Session execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nothing has run since the last reset.
    Idle,
    /// Batches are being executed.
    Running,
    /// Stopped by the user or after a single step.
    Paused,
    /// A cursor reached a breakpoint cell.
    Breakpoint { row: usize, col: usize },
    /// The next tick needs input and none is queued.
    WaitingInput,
    /// All cursors have terminated.
    Halted,
}

/// Snapshot of one cursor for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorView {
    /// Position in the session's cursor listing.
    pub index: usize,
    /// Instruction pointer.
    pub ip: Position,
    /// Instruction pointer heading.
    pub dir: Direction,
    /// Data pointer.
    pub dp: Position,
    /// Current mode.
    pub mode: Mode,
}

/// Views of an interpreter's live cursors, in storage order.
pub fn cursor_views(interp: &Interpreter) -> Vec<CursorView> {
    interp
        .cursors()
        .filter_map(|cursor| Some((cursor.ip()?, cursor)))
        .enumerate()
        .map(|(index, (ip, cursor))| CursorView {
            index,
            ip,
            dir: cursor.ip_dir,
            dp: cursor.dp(),
            mode: cursor.mode,
        })
        .collect()
}

/// Debug session over one program.
///
/// Holds the program as loaded so [`reset`](Self::reset) can restart it,
/// queues input bytes and collects output bytes.
#[derive(Debug, Clone)]
pub struct Session {
    initial: Interpreter,
    current: Interpreter,
    breakpoints: Vec<Breakpoint>,
    status: SessionStatus,
    /// Ticks per [`fast_forward`](Self::fast_forward).
    fast_ticks: u64,
    /// Stop with [`SessionStatus::WaitingInput`] instead of feeding end of
    /// input when the queue is empty.
    block_on_input: bool,
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl Session {
    /// Start a session on `interp`, keeping a copy of it for reset.
    pub fn new(interp: Interpreter) -> Self {
        Self {
            initial: interp.clone(),
            current: interp,
            breakpoints: Vec::new(),
            status: SessionStatus::Idle,
            fast_ticks: DEFAULT_FAST_TICKS,
            block_on_input: false,
            input: VecDeque::new(),
            output: Vec::new(),
        }
    }

    /// Create a session with the fast batch size from `config`.
    pub fn from_config(interp: Interpreter, config: &Config) -> Self {
        Self::new(interp).with_fast_ticks(config.fast_ticks())
    }

    /// Set the fast batch size.
    pub fn with_fast_ticks(mut self, ticks: u64) -> Self {
        self.fast_ticks = ticks;
        self
    }

    /// Wait for queued input instead of feeding end of input.
    pub fn with_input_blocking(mut self, block: bool) -> Self {
        self.block_on_input = block;
        self
    }

    /// The running interpreter.
    pub fn interpreter(&self) -> &Interpreter {
        &self.current
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Restart from the program as loaded.
    ///
    /// Breakpoints and queued input are kept; collected output is dropped.
    pub fn reset(&mut self) {
        self.current = self.initial.clone();
        self.output.clear();
        self.status = SessionStatus::Idle;
        log::debug!("Session reset");
    }

    /// Add an enabled breakpoint.
    pub fn add_breakpoint(&mut self, row: usize, col: usize) {
        match self.find_breakpoint(row, col) {
            Some(index) => self.breakpoints[index].enabled = true,
            None => self.breakpoints.push(Breakpoint::new(row, col)),
        }
    }

    /// Flip a cell's breakpoint, returning whether it is now enabled.
    pub fn toggle_breakpoint(&mut self, row: usize, col: usize) -> bool {
        match self.find_breakpoint(row, col) {
            Some(index) => {
                let bp = &mut self.breakpoints[index];
                bp.enabled = !bp.enabled;
                bp.enabled
            }
            None => {
                self.breakpoints.push(Breakpoint::new(row, col));
                true
            }
        }
    }

    /// Remove all breakpoints.
    pub fn clear_breakpoints(&mut self) {
        self.breakpoints.clear();
    }

    /// All breakpoints, enabled or not.
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Whether an enabled breakpoint sits on the cell.
    pub fn is_breakpoint(&self, row: usize, col: usize) -> bool {
        self.breakpoints
            .iter()
            .any(|bp| bp.enabled && bp.row == row && bp.col == col)
    }

    fn find_breakpoint(&self, row: usize, col: usize) -> Option<usize> {
        self.breakpoints
            .iter()
            .position(|bp| bp.row == row && bp.col == col)
    }

    /// Check if any cursor sits on a breakpoint.
    fn check_breakpoints(&self) -> Option<Position> {
        self.current
            .cursors()
            .filter_map(|cursor| cursor.ip())
            .find(|ip| self.is_breakpoint(ip.row, ip.col))
    }

    /// Queue input bytes.
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }

    /// Output collected since the last reset or [`take_output`](Self::take_output).
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Drain collected output.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Views of the live cursors.
    pub fn cursors(&self) -> Vec<CursorView> {
        cursor_views(&self.current)
    }

    /// Execute a single tick and pause.
    pub fn step(&mut self) -> Result<SessionStatus, EngineError> {
        self.batch(1)?;
        if self.status == SessionStatus::Running {
            self.status = SessionStatus::Paused;
        }
        Ok(self.status)
    }

    /// Execute one fast batch.
    pub fn fast_forward(&mut self) -> Result<u64, EngineError> {
        self.run(self.fast_ticks)
    }

    /// Run for up to `max_ticks` ticks.
    ///
    /// Stops early on halt, a breakpoint, or missing input when blocking.
    /// Returns the number of ticks actually executed.
    pub fn run(&mut self, max_ticks: u64) -> Result<u64, EngineError> {
        self.batch(max_ticks)
    }

    fn batch(&mut self, max_ticks: u64) -> Result<u64, EngineError> {
        if self.current.is_halted() {
            self.status = SessionStatus::Halted;
            return Ok(0);
        }

        let start = self.current.ticks();
        self.status = SessionStatus::Running;

        for _ in 0..max_ticks {
            let input = if self.current.needs_input() {
                match self.input.pop_front() {
                    Some(byte) => Some(byte),
                    None if self.block_on_input => {
                        self.status = SessionStatus::WaitingInput;
                        break;
                    }
                    None => None,
                }
            } else {
                None
            };

            let tick = self.current.step(input)?;
            if let Some(byte) = tick.output {
                self.output.push(byte);
            }

            if tick.is_halted() {
                self.status = SessionStatus::Halted;
                break;
            }

            if let Some(ip) = self.check_breakpoints() {
                log::debug!("Breakpoint hit at ({}, {})", ip.row, ip.col);
                self.status = SessionStatus::Breakpoint {
                    row: ip.row,
                    col: ip.col,
                };
                break;
            }
        }

        Ok(self.current.ticks() - start)
    }

    /// Pause execution.
    pub fn pause(&mut self) {
        if self.status == SessionStatus::Running {
            self.status = SessionStatus::Paused;
        }
    }

    /// Resume execution from paused, breakpoint or waiting state.
    pub fn resume(&mut self) {
        match self.status {
            SessionStatus::Paused
            | SessionStatus::Breakpoint { .. }
            | SessionStatus::WaitingInput => self.status = SessionStatus::Running,
            _ => {}
        }
    }

    /// Get a status string for the session.
    pub fn status_string(&self) -> &'static str {
        match self.status {
            SessionStatus::Idle => "Idle",
            SessionStatus::Running => "Running",
            SessionStatus::Paused => "Paused",
            SessionStatus::Breakpoint { .. } => "Breakpoint",
            SessionStatus::WaitingInput => "Waiting for input",
            SessionStatus::Halted => "Halted",
        }
    }
}
