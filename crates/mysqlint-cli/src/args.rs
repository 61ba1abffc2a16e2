use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the mysqlint binary.
#[derive(Parser, Debug)]
#[command(
    name = "mysqlint",
    version,
    about = "Static analysis for MySQL client usage"
)]
pub struct CliArgs {
    /// Source file to analyze.
    pub file: PathBuf,

    /// Output format for findings.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
