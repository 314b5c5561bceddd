//! Driver loop for running programs against byte streams.
//!
//! The [`Runner`] ticks an [`Interpreter`] repeatedly, fetching an input
//! byte only on ticks that will consume one and forwarding every output
//! byte to a sink. End of input is `None`, never a byte value, and leaves
//! input cells untouched.
//!
//! # Example
//!
//! ```ignore
//! use refunge::runner::{ReadSource, Runner, WriteSink};
//!
//! let stdin = std::io::stdin();
//! let stdout = std::io::stdout();
//! let mut runner = Runner::new(ReadSource::new(stdin.lock()), WriteSink::new(stdout.lock()))
//!     .with_tick_limit(1_000_000);
//!
//! let summary = runner.run(&mut interp)?;
//! assert!(summary.halted);
//! ```

use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};

use anyhow::{Context, Result};

use crate::interpreter::{Interpreter, Tick};

/// Supplier of input bytes.
pub trait ByteSource {
    /// Next input byte, or `None` at end of input.
    fn next_byte(&mut self) -> Result<Option<u8>>;
}

/// Consumer of output bytes.
pub trait ByteSink {
    /// Deliver one output byte.
    fn emit(&mut self, byte: u8) -> Result<()>;
}

impl ByteSource for VecDeque<u8> {
    fn next_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.pop_front())
    }
}

impl ByteSink for Vec<u8> {
    fn emit(&mut self, byte: u8) -> Result<()> {
        self.push(byte);
        Ok(())
    }
}

/// [`ByteSource`] over any reader, one byte at a time.
///
/// Once the reader reports end of input it is not read again.
#[derive(Debug)]
pub struct ReadSource<R> {
    reader: R,
    eof: bool,
}

impl<R: Read> ReadSource<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self { reader, eof: false }
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn next_byte(&mut self) -> Result<Option<u8>> {
        if self.eof {
            return Ok(None);
        }

        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => {
                    log::debug!("End of input");
                    self.eof = true;
                    return Ok(None);
                }
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).context("Failed to read input"),
            }
        }
    }
}

/// [`ByteSink`] over any writer, flushed after every byte.
#[derive(Debug)]
pub struct WriteSink<W> {
    writer: W,
}

impl<W: Write> WriteSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ByteSink for WriteSink<W> {
    fn emit(&mut self, byte: u8) -> Result<()> {
        self.writer
            .write_all(&[byte])
            .and_then(|()| self.writer.flush())
            .context("Failed to write output")
    }
}

/// Result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks executed by this run.
    pub ticks: u64,
    /// Whether every cursor terminated.
    pub halted: bool,
    /// Input bytes consumed.
    pub bytes_in: u64,
    /// Output bytes emitted.
    pub bytes_out: u64,
}

impl RunSummary {
    /// Check if the program ran to completion.
    pub fn success(&self) -> bool {
        self.halted
    }
}

/// Ticks an interpreter, wiring its I/O to a source and a sink.
#[derive(Debug)]
pub struct Runner<S, K> {
    source: S,
    sink: K,
    /// Maximum ticks per [`run`](Self::run) (`None` = unlimited).
    tick_limit: Option<u64>,
    bytes_in: u64,
    bytes_out: u64,
}

impl<S: ByteSource, K: ByteSink> Runner<S, K> {
    /// Create a runner with no tick limit.
    pub fn new(source: S, sink: K) -> Self {
        Self {
            source,
            sink,
            tick_limit: None,
            bytes_in: 0,
            bytes_out: 0,
        }
    }

    /// Stop [`run`](Self::run) after `limit` ticks.
    pub fn with_tick_limit(mut self, limit: u64) -> Self {
        self.tick_limit = Some(limit);
        self
    }

    /// Get the sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Unwrap the source and sink.
    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }

    /// Execute one tick.
    ///
    /// The source is read only when the interpreter will consume a byte.
    pub fn tick(&mut self, interp: &mut Interpreter) -> Result<Tick> {
        let input = if interp.needs_input() {
            let byte = self.source.next_byte()?;
            if byte.is_some() {
                self.bytes_in += 1;
            }
            byte
        } else {
            None
        };

        let tick = interp.step(input)?;

        if let Some(byte) = tick.output {
            self.sink.emit(byte)?;
            self.bytes_out += 1;
        }

        Ok(tick)
    }

    /// Run until the program halts or the tick limit is reached.
    pub fn run(&mut self, interp: &mut Interpreter) -> Result<RunSummary> {
        let start = interp.ticks();
        let (bytes_in, bytes_out) = (self.bytes_in, self.bytes_out);
        let mut halted = interp.is_halted();

        while !halted {
            if let Some(limit) = self.tick_limit {
                if interp.ticks() - start >= limit {
                    log::info!("Tick limit of {} reached", limit);
                    break;
                }
            }
            halted = self.tick(interp)?.is_halted();
        }

        Ok(RunSummary {
            ticks: interp.ticks() - start,
            halted,
            bytes_in: self.bytes_in - bytes_in,
            bytes_out: self.bytes_out - bytes_out,
        })
    }
}
