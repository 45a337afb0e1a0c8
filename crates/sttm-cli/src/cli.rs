//! CLI argument definitions for the impact analyzer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use sttm_model::ScoringPreset;

#[derive(Parser)]
#[command(
    name = "sttm-impact",
    version,
    about = "STTM test impact analyzer - find test cases affected by mapping changes",
    long_about = "Find test cases affected by source-to-target mapping changes.\n\n\
                  Reads a mapping difference report (JSON) and a test case export (spreadsheet or CSV),\n\
                  scores every test case against every changed tab and recommends an action."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score every test case against every changed tab.
    Analyze(AnalyzeArgs),

    /// Parse a mapping diff and summarise its changes.
    Diff(DiffArgs),

    /// Parse a test case export and summarise it.
    Tests(TestsArgs),

    /// Write a preset scoring configuration as JSON.
    Config(ConfigArgs),

    /// Explain a scoring configuration with example scores.
    Explain(ExplainArgs),
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Mapping difference report (JSON).
    #[arg(value_name = "MAPPING_DIFF")]
    pub mapping_diff: PathBuf,

    /// Test case export: a spreadsheet, a CSV file, or a directory of CSV sheets.
    #[arg(value_name = "TEST_CASES")]
    pub test_cases: PathBuf,

    /// Scoring configuration file (takes precedence over --preset).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Built-in scoring preset.
    #[arg(long = "preset", value_enum)]
    pub preset: Option<PresetArg>,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "summary")]
    pub format: ReportFormatArg,

    /// Write the report to a file instead of stdout.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Mapping difference report (JSON).
    #[arg(value_name = "MAPPING_DIFF")]
    pub mapping_diff: PathBuf,
}

#[derive(Parser)]
pub struct TestsArgs {
    /// Test case export: a spreadsheet, a CSV file, or a directory of CSV sheets.
    #[arg(value_name = "TEST_CASES")]
    pub test_cases: PathBuf,
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// Preset to write.
    #[arg(value_name = "PRESET", value_enum, default_value = "balanced")]
    pub preset: PresetArg,

    /// Write to a file instead of stdout.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ExplainArgs {
    /// Scoring configuration file (takes precedence over --preset).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Built-in scoring preset.
    #[arg(long = "preset", value_enum)]
    pub preset: Option<PresetArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Summary,
    Json,
}

/// CLI scoring preset choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    Conservative,
    Balanced,
    Aggressive,
    Strict,
}

impl From<PresetArg> for ScoringPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Conservative => Self::Conservative,
            PresetArg::Balanced => Self::Balanced,
            PresetArg::Aggressive => Self::Aggressive,
            PresetArg::Strict => Self::Strict,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
