// logscan - app/render.rs
//
// Terminal rendering of scan events: the fixed annotated-line layout.
//
//   [C:L18] line before match      <- context (dim)
//   [1:L20] ERROR: actual match    <- match (severity colour)
//   --                             <- separator between disjoint groups
//
// Colour selection mirrors the severity table: fatal/error red, warning
// yellow, info green, debug blue, unknown uncoloured.

use crate::core::context::{EventSink, ScanEvent};
use crate::core::model::Severity;
use std::io::{self, Write};

// ANSI escape sequences.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const BLUE: &str = "\x1b[34m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// ANSI colour for a severity level.
fn severity_color(level: Severity) -> &'static str {
    match level {
        Severity::Fatal | Severity::Error => RED,
        Severity::Warning => YELLOW,
        Severity::Info => GREEN,
        Severity::Debug => BLUE,
        Severity::Unknown => RESET,
    }
}

/// Renders scan events into a writer, optionally with ANSI colour.
///
/// Generic over the destination so integration tests can capture output in
/// a `Vec<u8>` while production writes to a locked, buffered stdout.
pub struct Renderer<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Write the trailing summary line. A blank line separates it from the
    /// annotated output, matching the fixed layout.
    pub fn summary(&mut self, matches: u64) -> io::Result<()> {
        writeln!(self.out, "\nTotal Matches: {matches}")
    }

    /// Flush and recover the writer (used by tests to inspect output).
    pub fn into_inner(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> EventSink for Renderer<W> {
    fn emit(&mut self, event: ScanEvent<'_>) -> io::Result<()> {
        match event {
            ScanEvent::GroupSeparator => writeln!(self.out, "--"),
            ScanEvent::Context { line_number, text } => {
                if self.color {
                    writeln!(self.out, "{DIM}[C:L{line_number}] {text}{RESET}")
                } else {
                    writeln!(self.out, "[C:L{line_number}] {text}")
                }
            }
            ScanEvent::Match {
                line_number,
                severity,
                text,
            } => {
                let code = severity.code();
                if self.color {
                    let color = severity_color(severity);
                    writeln!(self.out, "{color}[{code}:L{line_number}] {text}{RESET}")
                } else {
                    writeln!(self.out, "[{code}:L{line_number}] {text}")
                }
            }
        }
    }
}
