// logscan - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every fatal error carries its cause
// so the boundary can print a single human-readable message.
//
// Taxonomy:
//   - ConfigError: detected before the scan starts (bad regex, bad bound).
//   - ScanError:   I/O failures during the scan (open, map, write output).
// Timestamp parse failures are deliberately NOT errors; they are local,
// silent, and only feed the end-of-scan warning heuristic.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all logscan operations.
/// Errors are categorised by the phase that produced them.
#[derive(Debug)]
pub enum LogScanError {
    /// Configuration was rejected before scanning started.
    Config(ConfigError),

    /// The scan itself failed (file access or output I/O).
    Scan(ScanError),
}

impl fmt::Display for LogScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Scan(e) => write!(f, "Scan error: {e}"),
        }
    }
}

impl std::error::Error for LogScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Scan(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors detected while turning command-line options into a scan
/// configuration. All of these abort before the file is opened.
#[derive(Debug)]
pub enum ConfigError {
    /// A user-supplied search pattern is not a valid regex (regex mode only).
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },

    /// A `--from`/`--to` value could not be parsed as a timestamp.
    InvalidTimeBound {
        flag: &'static str,
        value: String,
        source: chrono::ParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegex { pattern, source } => {
                write!(f, "Invalid search pattern '{pattern}': {source}")
            }
            Self::InvalidTimeBound {
                flag,
                value,
                source,
            } => write!(
                f,
                "Invalid {flag} value '{value}': {source}. \
                 Expected 'YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD'."
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            Self::InvalidTimeBound { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for LogScanError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Scan errors
// ---------------------------------------------------------------------------

/// I/O failures while scanning. No retry: log files are assumed stable for
/// the duration of a single scan, so any failure here is fatal.
#[derive(Debug)]
pub enum ScanError {
    /// I/O error with path context (open, metadata, memory map).
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },

    /// Writing rendered output failed (closed pipe, full disk).
    Output { source: io::Error },
}

impl ScanError {
    /// Attach path and operation context to an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation,
            source,
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
            Self::Output { source } => write!(f, "Failed to write output: {source}"),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Output { source } => Some(source),
        }
    }
}

impl From<ScanError> for LogScanError {
    fn from(e: ScanError) -> Self {
        Self::Scan(e)
    }
}

/// Convenience type alias for logscan results.
pub type Result<T> = std::result::Result<T, LogScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_includes_context() {
        let err = ScanError::io(
            "/var/log/app.log",
            "memory map",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("memory map"), "missing operation: {msg}");
        assert!(msg.contains("/var/log/app.log"), "missing path: {msg}");
    }

    #[test]
    fn test_invalid_regex_preserves_source() {
        use std::error::Error;
        let source = regex::Regex::new("[unclosed").unwrap_err();
        let err: LogScanError = ConfigError::InvalidRegex {
            pattern: "[unclosed".to_string(),
            source,
        }
        .into();
        assert!(err.to_string().starts_with("Configuration error:"));
        assert!(err.source().is_some());
    }
}
