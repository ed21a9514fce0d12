// logscan - util/constants.rs
//
// Single source of truth for all named constants and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "logscan";

/// Current application version (from Cargo.toml).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Timestamp handling
// =============================================================================

/// Byte length of the fixed-width timestamp prefix at the start of a log
/// line: `YYYY-MM-DD HH:MM:SS` (the day-first and month-first layouts have
/// the same width). Lines shorter than this never reach the timestamp
/// parser.
pub const TIMESTAMP_PREFIX_LEN: usize = 19;

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG nor --debug is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";
