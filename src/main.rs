// logscan - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Logging initialisation (debug mode support)
// 3. ScanConfig assembly (time-bound parsing, preset resolution)
// 4. Scan execution and process exit codes

use clap::{Parser, ValueEnum};
use logscan::core::model::{KeywordPreset, ScanConfig, TimestampFormat};
use logscan::util::error::{ConfigError, Result};
use logscan::{app, util};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Severity keyword presets selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum PresetArg {
    #[default]
    Generic,
    Syslog,
    Java,
    Android,
}

impl From<PresetArg> for KeywordPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Generic => KeywordPreset::Generic,
            PresetArg::Syslog => KeywordPreset::Syslog,
            PresetArg::Java => KeywordPreset::Java,
            PresetArg::Android => KeywordPreset::Android,
        }
    }
}

/// Timestamp format override. `mdy` is only reachable here; detection never
/// chooses it because a two-digit-first date is read day-first by policy.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateFormatArg {
    /// YYYY-MM-DD HH:MM:SS
    Ymd,
    /// DD-MM-YYYY HH:MM:SS
    Dmy,
    /// MM-DD-YYYY HH:MM:SS
    Mdy,
}

impl From<DateFormatArg> for TimestampFormat {
    fn from(arg: DateFormatArg) -> Self {
        match arg {
            DateFormatArg::Ymd => TimestampFormat::YmdHms,
            DateFormatArg::Dmy => TimestampFormat::DmyHms,
            DateFormatArg::Mdy => TimestampFormat::MdyHms,
        }
    }
}

/// logscan - single-pass log file scanner.
///
/// Scans a log file for one or more patterns, with optional date-range
/// filtering, grep-style context lines, and severity-annotated output.
#[derive(Parser, Debug)]
#[command(name = "logscan", version, about)]
struct Cli {
    /// Log file to scan.
    file: PathBuf,

    /// Patterns to search for (first match wins per line).
    #[arg(required = true)]
    patterns: Vec<String>,

    /// Case-insensitive matching.
    #[arg(short = 'i', long = "ignore-case")]
    ignore_case: bool,

    /// Treat patterns as regular expressions.
    #[arg(short = 'r', long = "regex")]
    regex: bool,

    /// Only lines at or after this time ('YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD').
    #[arg(long = "from", value_name = "TIME")]
    from: Option<String>,

    /// Only lines at or before this time ('YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD').
    #[arg(long = "to", value_name = "TIME")]
    to: Option<String>,

    /// Lines of leading context to print before each match.
    #[arg(short = 'B', long = "before-context", value_name = "N")]
    before_context: Option<usize>,

    /// Lines of trailing context to print after each match.
    #[arg(short = 'A', long = "after-context", value_name = "N")]
    after_context: Option<usize>,

    /// Lines of context on both sides (overridden by -B / -A).
    #[arg(short = 'C', long = "context", value_name = "N")]
    context: Option<usize>,

    /// Severity keyword preset used for match annotation.
    #[arg(short = 'k', long = "keyword-preset", value_enum, default_value = "generic")]
    keyword_preset: PresetArg,

    /// Force the timestamp format instead of auto-detecting it.
    #[arg(long = "date-format", value_enum, value_name = "FORMAT")]
    date_format: Option<DateFormatArg>,

    /// Disable ANSI colour output.
    #[arg(long = "no-color")]
    no_color: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Parse a `--from`/`--to` value: full timestamp first, then date-only
/// (midnight). Calendar fields are interpreted as UTC, matching how line
/// timestamps are read.
fn parse_time_bound(
    flag: &'static str,
    value: &str,
) -> std::result::Result<chrono::DateTime<chrono::Utc>, ConfigError> {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|full_err| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|d| d.and_time(NaiveTime::MIN))
                .map_err(|_| full_err)
        })
        .map(|naive| naive.and_utc())
        .map_err(|source| ConfigError::InvalidTimeBound {
            flag,
            value: value.to_string(),
            source,
        })
}

/// Turn parsed CLI arguments into an immutable scan configuration.
fn build_config(cli: &Cli) -> std::result::Result<ScanConfig, ConfigError> {
    let from_time = cli
        .from
        .as_deref()
        .map(|v| parse_time_bound("--from", v))
        .transpose()?;
    let to_time = cli
        .to
        .as_deref()
        .map(|v| parse_time_bound("--to", v))
        .transpose()?;

    Ok(ScanConfig {
        file: cli.file.clone(),
        patterns: cli.patterns.clone(),
        case_insensitive: cli.ignore_case,
        use_regex: cli.regex,
        from_time,
        to_time,
        keywords: KeywordPreset::from(cli.keyword_preset).keywords(),
        forced_format: cli.date_format.map(TimestampFormat::from),
        before_context: cli.before_context.or(cli.context).unwrap_or(0),
        after_context: cli.after_context.or(cli.context).unwrap_or(0),
    })
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    app::run::run_scan(&config, &mut out, !cli.no_color)?;
    out.flush()
        .map_err(|e| logscan::util::error::ScanError::Output { source: e })?;

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    util::logging::init(cli.debug);

    tracing::debug!(
        version = util::constants::APP_VERSION,
        file = %cli.file.display(),
        "logscan starting"
    );

    if let Err(e) = run(&cli) {
        tracing::error!(error = %e, "Fatal error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
