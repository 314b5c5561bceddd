//! The interpreter and its synchronized tick.

use std::path::Path;

use smallvec::SmallVec;

use crate::grid::{Grid, Size};
use crate::interpreter::error::{EngineError, LoadError};
use crate::interpreter::execute::{self, Outcome};
use crate::interpreter::state::{Cursor, CursorId, CursorSet, Effect};

use super::options::{Features, Options};
use super::tick::{OutputLatch, StepStatus, Tick};

/// A program grid and the cursors running on it.
///
/// `Clone` is a deep copy: the clone owns its own grid buffer and cursor
/// records, which is how front-ends keep an initial snapshot for reset.
#[derive(Debug, Clone)]
pub struct Interpreter {
    /// Program and data field.
    grid: Grid,
    /// Live cursors.
    cursors: CursorSet,
    /// Enabled features.
    features: Features,
    /// Ticks executed so far.
    ticks: u64,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an interpreter on an empty 1×1 grid with one cursor at the
    /// origin.
    pub fn new() -> Self {
        Self::with_grid(Grid::new(), Features::empty())
    }

    fn with_grid(grid: Grid, features: Features) -> Self {
        Self {
            grid,
            cursors: CursorSet::with_origin(),
            features,
            ticks: 0,
        }
    }

    /// Build an interpreter from program text.
    pub fn from_source(source: &[u8], options: Options) -> Result<Self, LoadError> {
        let grid = Grid::from_source(source, options.nul)?;
        Ok(Self::with_grid(grid, options.features))
    }

    /// Build an interpreter from a program file.
    pub fn from_source_file(path: impl AsRef<Path>, options: Options) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let interpreter = Self::from_source(&source, options)?;
        let size = interpreter.size();
        log::info!(
            "Loaded {} ({}x{} grid, {} bytes)",
            path.display(),
            size.height,
            size.width,
            source.len()
        );
        Ok(interpreter)
    }

    /// Logical grid size.
    pub fn size(&self) -> Size {
        self.grid.size()
    }

    /// The program grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Read a cell.
    ///
    /// # Panics
    ///
    /// Panics outside the logical size; see [`Grid::cell`] for a checked read.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.grid.get(row, col)
    }

    /// Write a cell.
    ///
    /// # Panics
    ///
    /// Panics outside the logical size.
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.grid.set(row, col, value);
    }

    /// Add to a cell, wrapping modulo 256.
    ///
    /// # Panics
    ///
    /// Panics outside the logical size.
    pub fn add(&mut self, row: usize, col: usize, delta: u8) {
        self.grid.add(row, col, delta);
    }

    /// Live cursors, in storage order.
    pub fn cursors(&self) -> impl Iterator<Item = &Cursor> + '_ {
        self.cursors.values()
    }

    /// Number of live cursors.
    pub fn cursor_count(&self) -> usize {
        self.cursors.len()
    }

    #[cfg(test)]
    pub(crate) fn cursor_set_mut(&mut self) -> &mut CursorSet {
        &mut self.cursors
    }

    /// True once every cursor has terminated.
    pub fn is_halted(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Ticks executed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Enabled features.
    pub fn features(&self) -> Features {
        self.features
    }

    /// Replace the enabled features.
    pub fn set_features(&mut self, features: Features) -> Features {
        self.features = features;
        self.features
    }

    /// Enable `features` in addition to those already set.
    pub fn add_features(&mut self, features: Features) -> Features {
        self.features |= features;
        self.features
    }

    /// Replace the enabled features from raw bits, dropping unknown bits.
    pub fn set_feature_bits(&mut self, bits: u32) -> u32 {
        self.set_features(Features::from_bits_truncate(bits)).bits()
    }

    /// Enable features from raw bits, dropping unknown bits.
    pub fn add_feature_bits(&mut self, bits: u32) -> u32 {
        self.add_features(Features::from_bits_truncate(bits)).bits()
    }

    /// Whether the next tick will consume an input byte.
    pub fn needs_input(&self) -> bool {
        self.cursors
            .values()
            .any(|cursor| execute::needs_input(&self.grid, cursor))
    }

    /// Advance every live cursor by exactly one tick.
    ///
    /// `input` is written by input effects this tick; pass `None` when no
    /// byte is available, which leaves those cells untouched. The phases are:
    ///
    /// 1. evaluate every cursor against the grid as it stood before the tick
    /// 2. store the input byte
    /// 3. apply add/subtract deltas
    /// 4. apply clears (clear-mode feature only)
    /// 5. drop cursors whose instruction pointer left the grid and check
    ///    whether the next tick needs input
    ///
    /// Grid growth is the only fallible step and happens before anything is
    /// committed, so an error leaves the interpreter unchanged.
    pub fn step(&mut self, input: Option<u8>) -> Result<Tick, EngineError> {
        if self.cursors.is_empty() {
            return Ok(Tick::halted());
        }

        let Size { width, height } = self.grid.size();

        // Phase 1: evaluate. Nothing below writes to the grid or cursor set.
        let mut latch = OutputLatch::Empty;
        let mut required_height = height;
        let mut staged: SmallVec<[(CursorId, Outcome); 8]> = SmallVec::with_capacity(self.cursors.len());

        for (id, cursor) in self.cursors.iter() {
            let outcome = execute::execute(&self.grid, cursor, self.features);
            if let Some(value) = outcome.output {
                latch.offer(value);
            }
            for next in outcome.cursor.iter().chain(outcome.fork.iter()) {
                required_height = required_height.max(next.dp_row + 1);
            }
            staged.push((id, outcome));
        }

        self.grid
            .ensure(required_height, width)
            .map_err(|source| EngineError::Grid {
                tick: self.ticks,
                source,
            })?;

        for (id, outcome) in staged {
            match outcome.cursor {
                Some(next) => {
                    if let Some(slot) = self.cursors.get_mut(id) {
                        *slot = next;
                    }
                }
                None => {
                    self.cursors.remove(id);
                    log::debug!("tick {}: cursor {:?} terminated by ^ on data row 0", self.ticks, id);
                }
            }
            if let Some(child) = outcome.fork {
                let child_id = self.cursors.insert(child);
                log::debug!("tick {}: cursor {:?} forked {:?}", self.ticks, id, child_id);
            }
        }

        // Phase 2: input.
        if let Some(byte) = input {
            for cursor in self.cursors.values() {
                if let Effect::Input { target } = cursor.effect {
                    self.grid.set(target.row, target.col, byte);
                }
            }
        }

        // Phase 3: add/subtract.
        for cursor in self.cursors.values() {
            if let Effect::Add { target, delta } = cursor.effect {
                self.grid.add(target.row, target.col, delta);
            }
        }

        // Phase 4: clear.
        if self.features.contains(Features::CLEAR_MODE) {
            for cursor in self.cursors.values() {
                if let Effect::Clear { target } = cursor.effect {
                    self.grid.set(target.row, target.col, 0);
                }
            }
        }

        // Phase 5: cull and assess.
        let height = self.grid.size().height;
        let tick = self.ticks;
        self.cursors.retain(|id, cursor| {
            let alive = cursor.ip_in_rows(height);
            if !alive {
                log::debug!("tick {}: cursor {:?} left the grid at row {}", tick, id, cursor.ip_row);
            }
            alive
        });

        let mut status = StepStatus::empty();
        if self.cursors.is_empty() {
            status |= StepStatus::HALTED;
        } else if self.needs_input() {
            status |= StepStatus::NEEDS_INPUT;
        }

        let output = latch.value();
        if output.is_some() {
            status |= StepStatus::OUTPUT;
        }

        self.ticks += 1;
        log::trace!(
            "tick {}: {} cursors, status {:?}, output {:?}",
            tick,
            self.cursors.len(),
            status,
            output
        );

        Ok(Tick { status, output })
    }

    /// Run until halted or `max_ticks` ticks have executed, feeding no input.
    ///
    /// Returns the number of ticks executed.
    pub fn run(&mut self, max_ticks: u64) -> Result<u64, EngineError> {
        let start = self.ticks;
        for _ in 0..max_ticks {
            if self.step(None)?.is_halted() {
                break;
            }
        }
        Ok(self.ticks - start)
    }
}
