// logscan - core/scan.rs
//
// Single-pass scan driver. Owns the per-scan mutable state (detected
// timestamp format, context window, counters) and walks the whole byte
// buffer once: split into lines without copying, classify each line, apply
// date filtering, and drive the context-window transitions.
//
// The buffer is whatever the app layer hands over (a memory map in
// production, a byte slice in tests); this module never touches the
// filesystem.

use crate::core::classify::{self, PatternSet};
use crate::core::context::{ContextWindow, EventSink};
use crate::core::model::{ScanConfig, ScanOutcome, TimestampFormat};
use crate::core::timestamp;
use crate::util::constants::TIMESTAMP_PREFIX_LEN;
use memchr::memchr;
use std::borrow::Cow;
use std::io;

/// Scan a complete file buffer, emitting output through `sink`.
///
/// `patterns` must be pre-compiled (pattern errors are configuration-time,
/// not scan-time). Returns the summary counters; the only error source is
/// the sink's writer.
pub fn scan_buffer(
    data: &[u8],
    config: &ScanConfig,
    patterns: &PatternSet,
    sink: &mut dyn EventSink,
) -> io::Result<ScanOutcome> {
    let mut window = ContextWindow::new(config.before_context, config.after_context);
    let mut outcome = ScanOutcome::default();

    // Set at most once per scan: a forced format wins outright, otherwise
    // the first line long enough to carry a prefix decides for the whole
    // file. Later lines never trigger re-detection.
    let mut detected: Option<TimestampFormat> = config.forced_format;

    let mut line_number: u64 = 0;
    let mut pos: usize = 0;

    while pos < data.len() {
        let end = match memchr(b'\n', &data[pos..]) {
            Some(offset) => pos + offset,
            None => data.len(),
        };

        // Trim one trailing carriage return (CRLF input).
        let mut line = &data[pos..end];
        if let [head @ .., b'\r'] = line {
            line = head;
        }
        line_number += 1;
        pos = end + 1;

        if detected.is_none() && line.len() >= TIMESTAMP_PREFIX_LEN {
            detected = timestamp::detect_format(&line[..TIMESTAMP_PREFIX_LEN]);
            if let Some(format) = detected {
                tracing::debug!(?format, line_number, "Timestamp format detected");
            }
        }

        // Date filtering. A filtered-out line is invisible to the context
        // engine: no countdown consumption, no buffering, no dedup update.
        if config.date_filter_active() {
            if let Some(format) = detected {
                if let Some(ts) = timestamp::extract_timestamp(line, format) {
                    outcome.timestamped_lines += 1;
                    if config.from_time.map_or(false, |from| ts < from)
                        || config.to_time.map_or(false, |to| ts > to)
                    {
                        continue;
                    }
                }
            }
        }

        // Borrowed for valid UTF-8 (the overwhelming case); lossy-owned
        // otherwise so a bad line degrades instead of aborting the scan.
        let text: Cow<'_, str> = String::from_utf8_lossy(line);

        if patterns.is_match(&text) {
            let severity = classify::classify(&text, &config.keywords);
            window.on_match(line_number, severity, text, sink)?;
            outcome.matches += 1;
        } else {
            window.on_miss(line_number, text, sink)?;
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ScanEvent;
    use crate::core::model::KeywordPreset;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    /// Sink that renders events in the plain output layout for assertions.
    #[derive(Default)]
    struct Recorder {
        lines: Vec<String>,
    }

    impl EventSink for Recorder {
        fn emit(&mut self, event: ScanEvent<'_>) -> io::Result<()> {
            self.lines.push(match event {
                ScanEvent::GroupSeparator => "--".to_string(),
                ScanEvent::Context { line_number, text } => {
                    format!("[C:L{line_number}] {text}")
                }
                ScanEvent::Match {
                    line_number,
                    severity,
                    text,
                } => format!("[{}:L{line_number}] {text}", severity.code()),
            });
            Ok(())
        }
    }

    fn config(patterns: &[&str]) -> ScanConfig {
        ScanConfig {
            file: PathBuf::from("test.log"),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            case_insensitive: false,
            use_regex: false,
            from_time: None,
            to_time: None,
            keywords: KeywordPreset::Generic.keywords(),
            forced_format: None,
            before_context: 0,
            after_context: 0,
        }
    }

    fn scan(data: &[u8], config: &ScanConfig) -> (ScanOutcome, Vec<String>) {
        let patterns =
            PatternSet::compile(&config.patterns, config.case_insensitive, config.use_regex)
                .unwrap();
        let mut sink = Recorder::default();
        let outcome = scan_buffer(data, config, &patterns, &mut sink).unwrap();
        (outcome, sink.lines)
    }

    #[test]
    fn test_spec_scenario_before_context() {
        let mut cfg = config(&["ERROR"]);
        cfg.before_context = 1;

        let (outcome, lines) = scan(b"INFO start\nERROR bad thing\nINFO end\n", &cfg);

        assert_eq!(outcome.matches, 1);
        assert_eq!(lines, vec!["[C:L1] INFO start", "[1:L2] ERROR bad thing"]);
    }

    #[test]
    fn test_empty_buffer_zero_matches() {
        let (outcome, lines) = scan(b"", &config(&["ERROR"]));
        assert_eq!(outcome, ScanOutcome::default());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_match_count_multiple_patterns_case_insensitive() {
        let mut cfg = config(&["ERROR", "WARN"]);
        cfg.case_insensitive = true;

        let (outcome, lines) = scan(b"this is a warn\n", &cfg);
        assert_eq!(outcome.matches, 1);
        // "warn" classifies as Warning (code 2).
        assert_eq!(lines, vec!["[2:L1] this is a warn"]);
    }

    #[test]
    fn test_crlf_lines_are_trimmed() {
        let (outcome, lines) = scan(b"ERROR one\r\nERROR two\r\n", &config(&["ERROR"]));
        assert_eq!(outcome.matches, 2);
        assert_eq!(lines, vec!["[1:L1] ERROR one", "[1:L2] ERROR two"]);
    }

    #[test]
    fn test_last_line_without_newline() {
        let (outcome, _) = scan(b"ERROR one\nERROR two", &config(&["ERROR"]));
        assert_eq!(outcome.matches, 2);
    }

    #[test]
    fn test_from_bound_round_trip() {
        let data = b"2025-01-01 00:00:00 ERROR foo\n";

        let mut cfg = config(&["ERROR"]);
        cfg.from_time = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 1).unwrap());
        let (outcome, lines) = scan(data, &cfg);
        assert_eq!(outcome.matches, 0);
        assert!(lines.is_empty());
        assert_eq!(outcome.timestamped_lines, 1);

        let cfg = config(&["ERROR"]);
        let (outcome, _) = scan(data, &cfg);
        assert_eq!(outcome.matches, 1);
    }

    #[test]
    fn test_to_bound_excludes_later_lines() {
        let data = b"2025-01-01 00:00:00 ERROR early\n2025-01-02 00:00:00 ERROR late\n";
        let mut cfg = config(&["ERROR"]);
        cfg.to_time = Some(Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap());

        let (outcome, lines) = scan(data, &cfg);
        assert_eq!(outcome.matches, 1);
        assert_eq!(lines, vec!["[1:L1] 2025-01-01 00:00:00 ERROR early"]);
        assert_eq!(outcome.timestamped_lines, 2);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let data = b"2025-01-01 00:00:00 ERROR edge\n";
        let mut cfg = config(&["ERROR"]);
        cfg.from_time = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        cfg.to_time = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());

        let (outcome, _) = scan(data, &cfg);
        assert_eq!(outcome.matches, 1);
    }

    #[test]
    fn test_format_detection_is_sticky() {
        // Line 1 fixes DmyHms for the whole file. Line 2 uses the year-first
        // layout; with re-detection it would parse (and be filtered by the
        // bound below), but under the sticky day-first format its prefix
        // fails to parse, so it carries no timestamp and survives.
        let data = b"15-01-2025 00:00:00 ERROR a\n2025-01-15 00:00:00 ERROR b\n";
        let mut cfg = config(&["ERROR"]);
        cfg.from_time = Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());

        let (outcome, lines) = scan(data, &cfg);
        assert_eq!(outcome.timestamped_lines, 1); // only line 1 parsed
        assert_eq!(outcome.matches, 1); // line 1 filtered, line 2 kept
        assert_eq!(lines, vec!["[1:L2] 2025-01-15 00:00:00 ERROR b"]);
    }

    #[test]
    fn test_filtered_lines_invisible_to_context_engine() {
        // The out-of-range line sits between the match and its after-context
        // but consumes no countdown and is never printed.
        let data = b"2025-01-05 00:00:00 ERROR hit\n\
                     2024-01-01 00:00:00 old noise\n\
                     2025-01-05 00:00:01 aftermath\n";
        let mut cfg = config(&["ERROR"]);
        cfg.from_time = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        cfg.after_context = 1;

        let (outcome, lines) = scan(data, &cfg);
        assert_eq!(outcome.matches, 1);
        assert_eq!(
            lines,
            vec![
                "[1:L1] 2025-01-05 00:00:00 ERROR hit",
                "[C:L3] 2025-01-05 00:00:01 aftermath",
            ]
        );
    }

    #[test]
    fn test_lines_without_timestamp_pass_date_filter() {
        // A line too short (or unparseable) carries no timestamp and is
        // never excluded by the range.
        let data = b"2025-01-01 00:00:00 INFO boot\nERROR no timestamp\n";
        let mut cfg = config(&["ERROR"]);
        cfg.from_time = Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());

        let (outcome, lines) = scan(data, &cfg);
        assert_eq!(outcome.matches, 1);
        assert_eq!(lines, vec!["[1:L2] ERROR no timestamp"]);
    }

    #[test]
    fn test_forced_mdy_format() {
        // 03-04-2025 is April 3rd under detection policy (day-first), but
        // March 4th when the month-first override is forced.
        let data = b"03-04-2025 00:00:00 ERROR ambiguous\n";
        let mut cfg = config(&["ERROR"]);
        cfg.forced_format = Some(TimestampFormat::MdyHms);
        cfg.from_time = Some(Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());

        let (outcome, _) = scan(data, &cfg);
        // March 4th < March 10th: filtered out under MDY.
        assert_eq!(outcome.matches, 0);
        assert_eq!(outcome.timestamped_lines, 1);

        cfg.forced_format = None;
        let (outcome, _) = scan(data, &cfg);
        // April 3rd >= March 10th: kept under the day-first default.
        assert_eq!(outcome.matches, 1);
    }

    #[test]
    fn test_regex_mode_counts() {
        let mut cfg = config(&[r"ERROR \d+"]);
        cfg.use_regex = true;

        let (outcome, _) = scan(b"ERROR 42\nERROR none\nERROR 7\n", &cfg);
        assert_eq!(outcome.matches, 2);
    }

    #[test]
    fn test_invalid_utf8_line_still_scans() {
        let data = b"ERROR broken \xff\xfe bytes\nplain line\n";
        let (outcome, lines) = scan(data, &config(&["ERROR"]));
        assert_eq!(outcome.matches, 1);
        assert!(lines[0].starts_with("[1:L1] ERROR broken"));
    }
}
