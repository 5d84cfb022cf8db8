//! CLI command definitions for textfeat.
//!
//! Provides commands to featurize texts, list the registered featurizers,
//! and manage the configuration file.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use textfeat_core::config::SentenceKeyStyle;
use textfeat_core::CollisionPolicy;

/// Main CLI application.
#[derive(Parser, Debug)]
#[command(name = "textfeat", author, version, about, long_about = None)]
pub struct Cli {
    /// Logging verbosity
    #[arg(short, long, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "TEXTFEAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute combined features for one or more texts
    Featurize(FeaturizeArgs),

    /// List registered featurizers
    List(ListArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Featurize arguments.
#[derive(Args, Debug)]
pub struct FeaturizeArgs {
    /// Texts to featurize; read from stdin when neither texts nor --input are given
    pub texts: Vec<String>,

    /// File with one text per line (blank lines are skipped)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Comma-separated featurizer names, in merge order
    #[arg(long, value_delimiter = ',')]
    pub featurizers: Vec<String>,

    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Include every key collision in the output and log it
    #[arg(long, default_value_t = false)]
    pub report_collisions: bool,

    /// Run featurizers on a worker pool
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Worker threads for --parallel
    #[arg(long)]
    pub workers: Option<usize>,

    /// Collision policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Key style for per-sentence sentiment features
    #[arg(long, value_enum)]
    pub sentence_keys: Option<SentenceKeysArg>,
}

/// List arguments.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Configuration arguments.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show {
        /// Output format (text prints TOML)
        #[arg(short, long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Write the default configuration file
    Init {
        /// Destination (defaults to the platform config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// Pretty-printed JSON
    Json,
    /// One JSON object per line
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Collision policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Later featurizer overwrites
    LastWriteWins,
    /// Earlier featurizer is kept
    FirstWriteWins,
    /// Fail on any collision
    Error,
}

impl From<PolicyArg> for CollisionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::LastWriteWins => CollisionPolicy::LastWriteWins,
            PolicyArg::FirstWriteWins => CollisionPolicy::FirstWriteWins,
            PolicyArg::Error => CollisionPolicy::Error,
        }
    }
}

/// Sentence sentiment key style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SentenceKeysArg {
    /// `0`, `1`, ...
    Positional,
    /// `sentiment_sentence_0`, ...
    Namespaced,
}

impl From<SentenceKeysArg> for SentenceKeyStyle {
    fn from(arg: SentenceKeysArg) -> Self {
        match arg {
            SentenceKeysArg::Positional => SentenceKeyStyle::Positional,
            SentenceKeysArg::Namespaced => SentenceKeyStyle::Namespaced,
        }
    }
}
