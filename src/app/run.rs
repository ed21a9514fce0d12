// logscan - app/run.rs
//
// Scan orchestration. App layer: owns all filesystem access (open, stat,
// memory map) and the output writer; the core layer only ever sees a byte
// buffer and an event sink.
//
// The map is dropped on every exit path when the scan scope ends, success
// or error; nothing here outlives the function.

use crate::app::render::Renderer;
use crate::core::classify::PatternSet;
use crate::core::model::{ScanConfig, ScanOutcome};
use crate::core::scan;
use crate::util::error::{Result, ScanError};
use std::fs::File;
use std::io::Write;
use std::time::Instant;

/// Run a full scan: compile patterns, map the file, scan, print the summary.
///
/// Writes all scan output (annotated lines, separators, summary) to `out`;
/// diagnostics go to the tracing subscriber. Returns the summary counters
/// so callers and tests can assert on them.
pub fn run_scan<W: Write>(config: &ScanConfig, out: W, color: bool) -> Result<ScanOutcome> {
    // Configuration-time work first: a malformed regex must fail before the
    // file is even opened.
    let patterns = PatternSet::compile(&config.patterns, config.case_insensitive, config.use_regex)
        .map_err(crate::util::error::LogScanError::from)?;
    tracing::debug!(
        patterns = config.patterns.len(),
        regex = config.use_regex,
        "Patterns compiled"
    );

    let mut renderer = Renderer::new(out, color);

    let file = File::open(&config.file)
        .map_err(|e| ScanError::io(&config.file, "open", e))?;
    let file_size = file
        .metadata()
        .map_err(|e| ScanError::io(&config.file, "metadata", e))?
        .len();

    // Empty file: zero matches, reported immediately. Not an error.
    if file_size == 0 {
        renderer
            .summary(0)
            .map_err(|e| ScanError::Output { source: e })?;
        tracing::info!(file = %config.file.display(), "Empty file, nothing to scan");
        return Ok(ScanOutcome::default());
    }

    // SAFETY: the map is read-only and logscan never mutates it. External
    // modification of the file during the map's lifetime is undefined
    // behaviour per memmap2's contract; acceptable for a scanner reading
    // already-written log files, which are assumed stable for one scan.
    let mmap = unsafe {
        memmap2::Mmap::map(&file).map_err(|e| ScanError::io(&config.file, "memory map", e))?
    };

    // One sequential pass: tell the kernel so readahead works in our favour.
    #[cfg(unix)]
    if let Err(e) = mmap.advise(memmap2::Advice::Sequential) {
        tracing::debug!(error = %e, "mmap advise failed (non-fatal)");
    }

    let started = Instant::now();
    let outcome = scan::scan_buffer(&mmap, config, &patterns, &mut renderer)
        .map_err(|e| ScanError::Output { source: e })?;

    // Date filtering with zero parseable timestamps usually means the file's
    // format was never detected, not that no lines were in range.
    if config.date_filter_active() && outcome.timestamped_lines == 0 {
        tracing::warn!(
            file = %config.file.display(),
            "Date filtering was requested, but no valid timestamps were found in the log lines"
        );
        eprintln!(
            "\nWarning: Date filtering was requested, but no valid timestamps \
             were found in the log lines."
        );
    }

    renderer
        .summary(outcome.matches)
        .map_err(|e| ScanError::Output { source: e })?;

    tracing::info!(
        file = %config.file.display(),
        bytes = file_size,
        matches = outcome.matches,
        timestamped = outcome.timestamped_lines,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Scan complete"
    );

    Ok(outcome)
}
