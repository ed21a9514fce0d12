// logscan - core/context.rs
//
// Grep-style context-window state machine (-A / -B / -C semantics).
//
// Four pieces of state drive every transition:
//   - a bounded ring buffer of not-yet-printed trailing lines (before-context),
//   - a countdown of lines still owed after the last match (after-context),
//   - the number of the last printed line (deduplicates overlapping windows),
//   - whether a match group is currently open (separator decisions).
//
// The engine emits events through an EventSink instead of printing, so the
// core stays free of terminal concerns and tests can capture the exact
// output sequence.

use crate::core::model::Severity;
use std::borrow::Cow;
use std::collections::VecDeque;
use std::io;

// =============================================================================
// Events
// =============================================================================

/// One unit of scan output, in emission order.
#[derive(Debug, PartialEq, Eq)]
pub enum ScanEvent<'a> {
    /// `--` between disjoint match groups.
    GroupSeparator,

    /// A before- or after-context line (rendered dimmed).
    Context { line_number: u64, text: &'a str },

    /// A matching line, annotated with its severity.
    Match {
        line_number: u64,
        severity: Severity,
        text: &'a str,
    },
}

/// Receiver for scan output events.
///
/// Write failures propagate back through the scan so a broken pipe aborts
/// cleanly instead of being silently swallowed.
pub trait EventSink {
    fn emit(&mut self, event: ScanEvent<'_>) -> io::Result<()>;
}

// =============================================================================
// Context window engine
// =============================================================================

/// The context-window state machine.
///
/// Lines filtered out by the date range must never be fed to this engine:
/// they neither match, consume countdown, enter the buffer, nor advance the
/// dedup tracker. Buffered text borrows from the scanned file buffer
/// (`Cow::Owned` only for lines that needed lossy UTF-8 conversion), so the
/// engine is scoped to a single scan.
#[derive(Debug)]
pub struct ContextWindow<'a> {
    /// Pending before-context lines, oldest first. Never holds more than
    /// `before_capacity` entries.
    before: VecDeque<(u64, Cow<'a, str>)>,

    /// Maximum before-context size (grep -B).
    before_capacity: usize,

    /// After-context lines still owed for the last match (grep -A).
    after_remaining: usize,

    /// Configured after-context size, restored on every match.
    after_capacity: usize,

    /// Number of the last line handed to the sink. `None` until the first
    /// emission.
    last_printed: Option<u64>,

    /// True once a match group has been opened; a later match separated by
    /// a gap of unprinted lines triggers a group separator.
    group_open: bool,
}

impl<'a> ContextWindow<'a> {
    pub fn new(before_capacity: usize, after_capacity: usize) -> Self {
        Self {
            before: VecDeque::with_capacity(before_capacity),
            before_capacity,
            after_remaining: 0,
            after_capacity,
            last_printed: None,
            group_open: false,
        }
    }

    /// Transition for a matching line.
    ///
    /// Emits, in order: a group separator when a previous group is open and
    /// the gap back to the last printed line exceeds one; any buffered
    /// before-context lines not already printed as earlier after-context;
    /// the match itself. Then arms the after-context countdown and clears
    /// the buffer.
    pub fn on_match(
        &mut self,
        line_number: u64,
        severity: Severity,
        text: Cow<'a, str>,
        sink: &mut dyn EventSink,
    ) -> io::Result<()> {
        if self.group_open {
            if let Some(last) = self.last_printed {
                // Gap is measured from the match line itself, before the
                // before-context flush. A buffered line bridging the gap
                // still gets a separator ahead of it.
                if line_number - last > 1 {
                    sink.emit(ScanEvent::GroupSeparator)?;
                }
            }
        }

        // Flush before-context, skipping lines already printed as an earlier
        // match's after-context (overlapping windows print each line once).
        while let Some((number, buffered)) = self.before.pop_front() {
            if self.last_printed.map_or(true, |last| number > last) {
                sink.emit(ScanEvent::Context {
                    line_number: number,
                    text: &buffered,
                })?;
                self.last_printed = Some(number);
            }
        }

        sink.emit(ScanEvent::Match {
            line_number,
            severity,
            text: &text,
        })?;
        self.last_printed = Some(line_number);
        self.after_remaining = self.after_capacity;
        self.group_open = true;
        Ok(())
    }

    /// Transition for a non-matching line.
    ///
    /// While the after-context countdown is active the line is emitted as
    /// context (unless the dedup check says it was already printed); the
    /// countdown consumes either way, modelling a fixed-size post-match
    /// window rather than "N more never-before-seen lines". Once the
    /// countdown is exhausted the line goes into the before-context ring.
    pub fn on_miss(
        &mut self,
        line_number: u64,
        text: Cow<'a, str>,
        sink: &mut dyn EventSink,
    ) -> io::Result<()> {
        if self.after_remaining > 0 {
            if self.last_printed.map_or(true, |last| line_number > last) {
                sink.emit(ScanEvent::Context {
                    line_number,
                    text: &text,
                })?;
                self.last_printed = Some(line_number);
            }
            self.after_remaining -= 1;
            return Ok(());
        }

        if self.before_capacity > 0 {
            self.before.push_back((line_number, text));
            if self.before.len() > self.before_capacity {
                self.before.pop_front();
            }
        }
        Ok(())
    }

    /// Current before-buffer occupancy, for invariant checks in tests.
    #[cfg(test)]
    fn buffered(&self) -> usize {
        self.before.len()
    }
}
