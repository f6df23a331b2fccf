//! CLI argument definitions for the crosswalk tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "xwalk",
    version,
    about = "Crosswalk - fuzzy-match two columns of records and review the pairings",
    long_about = "Align two columns of free-text records that name the same entities\n\
                  with inconsistent spellings. Ranks candidate matches per source\n\
                  record, pre-confirms obvious pairs, and tracks review decisions in\n\
                  a session file that exports to a confirmed crosswalk."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Rank candidate matches between two tables and write a session file.
    Match(MatchArgs),

    /// Export the confirmed matches from a session file.
    Export(ExportArgs),

    /// Show per-bucket review progress for a session file.
    Summary(SummaryArgs),
}

#[derive(Parser)]
pub struct MatchArgs {
    /// The left (source) table: CSV, TSV, or JSON.
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    /// The right (match) table: CSV, TSV, or JSON.
    #[arg(value_name = "RIGHT")]
    pub right: PathBuf,

    /// Column in the left table holding the records to match from.
    #[arg(long = "left-column", value_name = "COLUMN")]
    pub left_column: String,

    /// Column in the right table holding the candidate records.
    #[arg(long = "right-column", value_name = "COLUMN")]
    pub right_column: String,

    /// Join column in the left table; restricts comparison to records
    /// sharing a join value. Requires --right-join.
    #[arg(long = "left-join", value_name = "COLUMN", requires = "right_join")]
    pub left_join: Option<String>,

    /// Join column in the right table. Requires --left-join.
    #[arg(long = "right-join", value_name = "COLUMN", requires = "left_join")]
    pub right_join: Option<String>,

    /// Display-only metadata column in the left table.
    #[arg(long = "left-meta", value_name = "COLUMN")]
    pub left_meta: Option<String>,

    /// Display-only metadata column in the right table.
    #[arg(long = "right-meta", value_name = "COLUMN")]
    pub right_meta: Option<String>,

    /// Where to write the review session.
    #[arg(
        long = "output",
        short = 'o',
        value_name = "PATH",
        default_value = "session.json"
    )]
    pub output: PathBuf,

    /// Skip pre-confirming rows whose top candidate matches token for token.
    #[arg(long = "no-automatch")]
    pub no_automatch: bool,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// The session file written by `xwalk match`.
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,

    /// Where to write the confirmed crosswalk.
    #[arg(
        long = "output",
        short = 'o',
        value_name = "PATH",
        default_value = "crosswalk.json"
    )]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct SummaryArgs {
    /// The session file written by `xwalk match`.
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,
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
