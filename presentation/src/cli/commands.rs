//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for debate results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every round: arguments, rankings, scores, then the verdict
    Full,
    /// Only the score trend and the verdict
    Summary,
    /// JSON output
    Json,
}

impl From<agora_domain::OutputFormat> for OutputFormat {
    fn from(format: agora_domain::OutputFormat) -> Self {
        match format {
            agora_domain::OutputFormat::Full => OutputFormat::Full,
            agora_domain::OutputFormat::Summary => OutputFormat::Summary,
            agora_domain::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for agora
#[derive(Parser, Debug)]
#[command(name = "agora")]
#[command(author, version, about = "Multi-round debate and ranked-choice consensus between agents")]
#[command(long_about = r#"
Agora runs a structured debate between several participants on a question.

Each debate proceeds in rounds:
0. Opening: every participant states a position
1+. Rebuttal: participants argue, then rank every argument on the ballot
    Rankings become points; the debate stops once the leader holds
    enough of the attainable points, or when the round limit is hit.
Finally a judge confirms the score leader or overrides it with reasons.

Configuration files are loaded from (in priority order):
1. AGORA_* environment variables
2. --config <path>     Explicit config file
3. ./agora.toml        Project-level config
4. ~/.config/agora/config.toml   Global config

Example:
  agora --offline "Should our team adopt Rust?"
  agora --threshold 0.8 --max-iterations 5 "Tabs or spaces?"
  agora -o json --save "Is remote work here to stay?"
"#)]
pub struct Cli {
    /// The question to debate
    pub question: Option<String>,

    /// Replace every configured backend with scripted replies
    #[arg(long)]
    pub offline: bool,

    /// Maximum number of rebuttal rounds
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Rounds to run before consensus is checked
    #[arg(long, value_name = "N")]
    pub min_iterations: Option<usize>,

    /// Share of the attainable points the leader needs (0.0-1.0)
    #[arg(long, value_name = "RATIO")]
    pub threshold: Option<f64>,

    /// Let participants speak concurrently within a round
    #[arg(long)]
    pub concurrent: bool,

    /// Rotate the opening speaker every round
    #[arg(long)]
    pub rotate: bool,

    /// Do not let the judge override the score leader
    #[arg(long)]
    pub no_override: bool,

    /// Output format (defaults to [output] format, then full)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Save the finished debate to the archive directory
    #[arg(long)]
    pub save: bool,

    /// Write every debate event to a JSONL file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
