// logscan - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no terminal
// dependencies. These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

// =============================================================================
// Severity
// =============================================================================

/// Normalised severity levels, ordered from most to least severe.
///
/// Classification tests the keyword lists in this order, so a line that
/// contains both a "warning" and an "error" keyword classifies as `Error`.
/// The discriminant doubles as the numeric code printed in the annotated
/// output (`[2:L41]` is a warning on line 41).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Severity {
    Fatal = 0,
    Error = 1,
    Warning = 2,
    Info = 3,
    Debug = 4,
    #[default]
    Unknown = 5,
}

impl Severity {
    /// All variants in classification priority order (most severe first).
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Fatal,
            Severity::Error,
            Severity::Warning,
            Severity::Info,
            Severity::Debug,
            Severity::Unknown,
        ]
    }

    /// Numeric code used in the annotated-line output.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Human-readable label for diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Fatal => "Fatal",
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
            Severity::Debug => "Debug",
            Severity::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Severity keyword tables
// =============================================================================

/// Keyword lists consulted by severity classification, one list per level.
///
/// Resolved once at startup from a [`KeywordPreset`]; the classifier never
/// touches the preset tables directly. All matching is case-insensitive
/// substring search.
#[derive(Debug, Clone, Copy)]
pub struct SeverityKeywords {
    pub fatal: &'static [&'static str],
    pub error: &'static [&'static str],
    pub warning: &'static [&'static str],
    pub info: &'static [&'static str],
    pub debug: &'static [&'static str],
}

impl SeverityKeywords {
    /// The keyword list for one severity level. `Unknown` has no keywords.
    pub fn for_level(&self, level: Severity) -> &'static [&'static str] {
        match level {
            Severity::Fatal => self.fatal,
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
            Severity::Debug => self.debug,
            Severity::Unknown => &[],
        }
    }
}

/// Named severity keyword presets for common log dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordPreset {
    /// Broad keyword set suitable for most application logs.
    #[default]
    Generic,
    /// Syslog severity vocabulary (emergency/alert/critical/notice).
    Syslog,
    /// Java logging frameworks (log4j, logback, JUL).
    Java,
    /// Android logcat single-letter level markers.
    Android,
}

impl KeywordPreset {
    /// Resolve the preset into its immutable keyword table.
    pub fn keywords(&self) -> SeverityKeywords {
        match self {
            KeywordPreset::Generic => GENERIC_KEYWORDS,
            KeywordPreset::Syslog => SYSLOG_KEYWORDS,
            KeywordPreset::Java => JAVA_KEYWORDS,
            KeywordPreset::Android => ANDROID_KEYWORDS,
        }
    }
}

const GENERIC_KEYWORDS: SeverityKeywords = SeverityKeywords {
    fatal: &["fatal", "critical", "emergency", "alert"],
    error: &["error", "err", "exception"],
    warning: &["warning", "warn", "caution"],
    info: &["info", "information", "notice"],
    debug: &["debug", "dbg", "trace", "verbose"],
};

const SYSLOG_KEYWORDS: SeverityKeywords = SeverityKeywords {
    fatal: &["emergency", "alert", "critical"],
    error: &["error"],
    warning: &["warning", "notice"],
    info: &["info"],
    debug: &["debug"],
};

const JAVA_KEYWORDS: SeverityKeywords = SeverityKeywords {
    fatal: &["fatal"],
    error: &["error"],
    warning: &["warn"],
    info: &["info"],
    debug: &["debug", "trace"],
};

// Logcat lines carry a single-letter level surrounded by separators,
// so the keywords are spaced/slashed markers rather than words.
const ANDROID_KEYWORDS: SeverityKeywords = SeverityKeywords {
    fatal: &[" F ", " F/"],
    error: &[" E ", " E/"],
    warning: &[" W ", " W/"],
    info: &[" I ", " I/"],
    debug: &[" D ", " V "],
};

// =============================================================================
// Timestamp format
// =============================================================================

/// Recognised fixed-width timestamp layouts (all 19 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `YYYY-MM-DD HH:MM:SS`, preferred and checked first during detection.
    YmdHms,
    /// `DD-MM-YYYY HH:MM:SS`, what detection assumes for two-digit-first
    /// prefixes (European convention).
    DmyHms,
    /// `MM-DD-YYYY HH:MM:SS`. Never produced by detection, because a
    /// two-digit-first prefix is ambiguous and day-first is the documented
    /// policy. Reachable only through the `--date-format mdy` override.
    MdyHms,
}

// =============================================================================
// Scan configuration
// =============================================================================

/// Everything a scan needs to run. Built once from the CLI and immutable
/// for the duration of the scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Target log file.
    pub file: PathBuf,

    /// Patterns to match, in configuration order (first hit wins).
    pub patterns: Vec<String>,

    /// Case-insensitive matching (applies to literal and regex modes).
    pub case_insensitive: bool,

    /// Treat patterns as regular expressions instead of literal substrings.
    pub use_regex: bool,

    /// Inclusive lower time bound; lines with an earlier timestamp are
    /// skipped. `None` = no lower bound.
    pub from_time: Option<DateTime<Utc>>,

    /// Inclusive upper time bound. `None` = no upper bound.
    pub to_time: Option<DateTime<Utc>>,

    /// Severity keyword table, resolved from a preset at startup.
    pub keywords: SeverityKeywords,

    /// Force a timestamp format instead of detecting it from the first
    /// eligible line. The only way to get `MdyHms`.
    pub forced_format: Option<TimestampFormat>,

    /// Number of not-yet-printed lines kept before a match (grep -B).
    pub before_context: usize,

    /// Number of lines force-printed after a match (grep -A).
    pub after_context: usize,
}

impl ScanConfig {
    /// True when either time bound is set and date filtering applies.
    pub fn date_filter_active(&self) -> bool {
        self.from_time.is_some() || self.to_time.is_some()
    }
}

// =============================================================================
// Scan outcome
// =============================================================================

/// Summary counters for a completed scan, produced once at end of input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Lines that matched a pattern and survived date filtering.
    pub matches: u64,

    /// Lines whose prefix parsed as a timestamp. Zero here with date
    /// filtering active signals a likely format-detection failure.
    pub timestamped_lines: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_codes_follow_priority_order() {
        assert_eq!(Severity::Fatal.code(), 0);
        assert_eq!(Severity::Error.code(), 1);
        assert_eq!(Severity::Warning.code(), 2);
        assert_eq!(Severity::Info.code(), 3);
        assert_eq!(Severity::Debug.code(), 4);
        assert_eq!(Severity::Unknown.code(), 5);
    }

    #[test]
    fn test_all_is_ordered_most_severe_first() {
        let all = Severity::all();
        for pair in all.windows(2) {
            assert!(pair[0].code() < pair[1].code());
        }
    }

    #[test]
    fn test_preset_resolution() {
        let generic = KeywordPreset::Generic.keywords();
        assert!(generic.error.contains(&"exception"));

        let java = KeywordPreset::Java.keywords();
        assert!(java.debug.contains(&"trace"));
        assert_eq!(java.for_level(Severity::Unknown), &[] as &[&str]);
    }
}
