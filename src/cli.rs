//! CLI argument parsing for tickscope

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary of every view (default)
    Text,
    /// JSON report for machine parsing and renderers
    Json,
    /// Normalized event table
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "tickscope")]
#[command(version)]
#[command(about = "Reconstruct CPU, lifecycle and blocking timelines from RTOS scheduler traces", long_about = None)]
pub struct Cli {
    /// Raw trace log to analyze
    #[arg(value_name = "TRACE")]
    pub trace: PathBuf,

    /// Lower tick bound (default: first tick minus margin)
    #[arg(long = "xmin", value_name = "TICK", allow_negative_numbers = true)]
    pub xmin: Option<i64>,

    /// Upper tick bound (default: last tick plus margin)
    #[arg(long = "xmax", value_name = "TICK", allow_negative_numbers = true)]
    pub xmax: Option<i64>,

    /// Hide a task from every view (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "TASK")]
    pub exclude: Vec<String>,

    /// TOML configuration file with bounds and exclusions
    #[arg(short = 'C', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Also write the normalized event table to FILE
    #[arg(short = 'o', long = "events-out", value_name = "FILE")]
    pub events_out: Option<PathBuf>,

    /// Add the original line as a raw_line column in event tables
    #[arg(long = "raw-line")]
    pub raw_line: bool,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_trace_path() {
        let cli = Cli::parse_from(["tickscope", "raw_log.txt"]);
        assert_eq!(cli.trace, PathBuf::from("raw_log.txt"));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.exclude.is_empty());
    }

    #[test]
    fn test_cli_requires_trace() {
        assert!(Cli::try_parse_from(["tickscope"]).is_err());
    }

    #[test]
    fn test_cli_bounds() {
        let cli = Cli::parse_from(["tickscope", "--xmin", "-5", "--xmax", "900", "t.log"]);
        assert_eq!(cli.xmin, Some(-5));
        assert_eq!(cli.xmax, Some(900));
    }

    #[test]
    fn test_cli_repeated_exclude() {
        let cli = Cli::parse_from(["tickscope", "-x", "Flush", "--exclude", "esp_timer", "t.log"]);
        assert_eq!(cli.exclude, vec!["Flush", "esp_timer"]);
    }

    #[test]
    fn test_cli_format_and_events_out() {
        let cli = Cli::parse_from([
            "tickscope",
            "--format",
            "json",
            "--events-out",
            "log_entries.csv",
            "--raw-line",
            "t.log",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.events_out, Some(PathBuf::from("log_entries.csv")));
        assert!(cli.raw_line);
    }

    #[test]
    fn test_cli_debug_default_false() {
        let cli = Cli::parse_from(["tickscope", "t.log"]);
        assert!(!cli.debug);
        assert!(cli.config.is_none());
    }
}
