//! odsdiff CLI - Command-line interface for ODS row diffs

pub mod compare;
pub mod progress;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::Level;

use crate::config::{DEFAULT_DELIMITER, DiffConfig};

/// Format of the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Parser)]
#[command(name = "odsdiff", version)]
#[command(about = "odsdiff: Make a diff between two .ods files", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Original ODS file
    #[arg(short = 'o', long = "f1", value_name = "ORIGIN")]
    f1: PathBuf,

    /// Modified ODS file
    #[arg(short = 'm', long = "f2", value_name = "MODIFIED")]
    f2: PathBuf,

    /// Output file (default: <origin>__diff__<modified>.ods next to the origin)
    #[arg(short = 'O', long = "out", value_name = "OUTPUT")]
    out: Option<PathBuf>,

    /// Cell delimiter used to compare rows
    #[arg(short, long, default_value_t = DEFAULT_DELIMITER)]
    delimiter: char,

    /// Log every hunk and debug details
    #[arg(short, long)]
    verbose: bool,

    /// Suppress progress output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl Cli {
    fn config(&self) -> DiffConfig {
        let config = DiffConfig::new()
            .with_verbose(self.verbose)
            .with_delimiter(self.delimiter);
        match &self.out {
            Some(out) => config.with_output_path(out),
            None => config,
        }
    }
}

/// Run the odsdiff CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    compare::compare(&cli.f1, &cli.f2, &cli.config(), cli.format, cli.quiet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "odsdiff", "-o", "a.ods", "-m", "b.ods", "-O", "out.ods", "-d", ",", "-v",
        ])
        .unwrap();
        let config = cli.config();
        assert!(config.verbose);
        assert_eq!(config.csv_delimiter, ',');
        assert_eq!(config.output_file_path, Some(PathBuf::from("out.ods")));
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_long_flags_and_defaults() {
        let cli = Cli::try_parse_from(["odsdiff", "--f1", "a.ods", "--f2", "b.ods", "--format", "json"])
            .unwrap();
        assert_eq!(cli.delimiter, ';');
        assert_eq!(cli.out, None);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_tab_delimiter() {
        let cli = Cli::try_parse_from(["odsdiff", "-o", "a.ods", "-m", "b.ods", "-d", "\t"]).unwrap();
        assert_eq!(cli.config().csv_delimiter, '\t');
        assert!(Cli::try_parse_from(["odsdiff", "-o", "a.ods", "-m", "b.ods", "-d", "\\t"]).is_err());
    }

    #[test]
    fn test_missing_input_is_usage_error() {
        assert!(Cli::try_parse_from(["odsdiff", "-o", "a.ods"]).is_err());
        assert!(Cli::try_parse_from(["odsdiff", "-o", "a.ods", "-m", "b.ods", "-v", "-q"]).is_err());
    }
}
