// logscan - core/classify.rs
//
// Per-line classification: does the line match a search pattern, and what
// severity level does it carry.
//
// Pattern matching short-circuits across the pattern list in configuration
// order. Severity detection tests the keyword lists in fixed priority order
// FATAL -> ERROR -> WARNING -> INFO -> DEBUG; the ordering is a correctness
// invariant, not an optimisation.

use crate::core::model::{Severity, SeverityKeywords};
use crate::util::error::ConfigError;
use regex::{Regex, RegexBuilder};

// =============================================================================
// Pattern matching
// =============================================================================

/// The compiled form of the user's search patterns.
///
/// Regex patterns are compiled once here, before the scan starts; a
/// malformed pattern is a configuration-time fatal error, never a per-line
/// one. Literal patterns are kept as-is and matched by substring search.
#[derive(Debug)]
pub enum PatternSet {
    Literal {
        patterns: Vec<String>,
        case_insensitive: bool,
    },
    Regex(Vec<Regex>),
}

impl PatternSet {
    /// Compile the pattern list for the requested mode.
    ///
    /// In regex mode the case-insensitive flag is applied uniformly to all
    /// patterns. The first invalid pattern aborts compilation.
    pub fn compile(
        patterns: &[String],
        case_insensitive: bool,
        use_regex: bool,
    ) -> Result<Self, ConfigError> {
        if !use_regex {
            return Ok(Self::Literal {
                patterns: patterns.to_vec(),
                case_insensitive,
            });
        }

        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(case_insensitive)
                .build()
                .map_err(|e| ConfigError::InvalidRegex {
                    pattern: pattern.clone(),
                    source: e,
                })?;
            compiled.push(regex);
        }
        Ok(Self::Regex(compiled))
    }

    /// True when any pattern matches the line. First hit wins; the pattern
    /// list is tested in configuration order.
    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Literal {
                patterns,
                case_insensitive,
            } => patterns.iter().any(|p| {
                if *case_insensitive {
                    contains_ignore_ascii_case(line, p)
                } else {
                    line.contains(p.as_str())
                }
            }),
            Self::Regex(regexes) => regexes.iter().any(|r| r.is_match(line)),
        }
    }
}

// =============================================================================
// Severity detection
// =============================================================================

/// Detect the severity level of a line by keyword scan.
///
/// The first level whose keyword list has any hit wins, so a line containing
/// both "warning" and "error" classifies as `Error`. No hit at all yields
/// `Unknown`.
pub fn classify(line: &str, keywords: &SeverityKeywords) -> Severity {
    for &level in Severity::all() {
        for keyword in keywords.for_level(level) {
            if contains_ignore_ascii_case(line, keyword) {
                return level;
            }
        }
    }
    Severity::Unknown
}

/// ASCII case-insensitive substring search.
///
/// Runs once per line-x-keyword in the scan hot loop, so it works over the
/// raw bytes instead of allocating lowercased copies. The keyword tables
/// are all ASCII; non-ASCII bytes in the line only ever compare by identity.
pub fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return true;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}
