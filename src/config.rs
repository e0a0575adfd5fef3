//! # config.rs
//!
//! Command-line parsing and the run configuration for combining htseq-count files.
//! It includes:
//! - `InputConfig`: Parses command-line arguments.
//! - `Defaults`: Built-in defaults loaded from the embedded TOML file.
//! - `RunConfig`: The explicit configuration record handed to every pipeline stage.
//! - `IndexMode`: Which gene IDs seed the row index of the combined matrix.
//!
//! Command-line values always win over the embedded defaults.

use clap::{Parser, ValueEnum};
use config::Config;
use serde::Deserialize;
use std::fmt::Display;
use std::path::PathBuf;

use crate::error::{CombineError, Result};

/// Configuration parsed from CLI input arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "htseq-combine",
    version = env!("CARGO_PKG_VERSION"),
    about = "Combine multiple htseq-count output files into a single count table for DESeq."
)]
pub struct InputConfig {
    /// htseq-count files to combine
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<String>,
    /// File name pattern to split on when deriving sample names [default: _htseq_count]
    #[arg(short, long)]
    pub pattern: Option<String>,
    /// Output file [default: output.tsv]
    #[arg(short, long)]
    pub output: Option<String>,
    /// Print progress messages
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
    /// Print per-sample processing details
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,
    /// Which gene IDs seed the rows of the output table [default: first]
    #[arg(short, long, value_enum)]
    pub index: Option<IndexMode>,
    /// Drop htseq-count summary counters (gene IDs starting with "__")
    #[arg(long, default_value_t = false)]
    pub skip_special: bool,
    /// Token written for genes missing from a sample [default: NA]
    #[arg(long = "missing")]
    pub missing_token: Option<String>,
}

/// Which gene IDs make up the row index of the combined table.
///
/// Rows are fixed once the index is chosen; genes outside it are never added.
#[derive(Debug, PartialEq, Eq, Clone, Copy, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    /// Gene IDs of the first processed file.
    First,
    /// Gene IDs of the last processed file, as the classic combine script did.
    Last,
    /// Every gene ID seen in any file, in first-seen order.
    Union,
}

impl Display for IndexMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode_str = match self {
            IndexMode::First => "first",
            IndexMode::Last => "last",
            IndexMode::Union => "union",
        };
        write!(f, "{}", mode_str)
    }
}

/// Built-in defaults, embedded at compile time.
pub const DEFAULTS_STR: &str = include_str!("../data/defaults.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Defaults {
    pub pattern: String,
    pub output: String,
    pub missing_token: String,
    pub index_mode: IndexMode,
}

impl Defaults {
    pub fn load() -> Result<Defaults> {
        let defaults = Config::builder()
            .add_source(config::File::from_str(
                DEFAULTS_STR,
                config::FileFormat::Toml,
            ))
            .build()?
            .try_deserialize::<Defaults>()?;
        Ok(defaults)
    }
}

/// Everything a run needs, resolved once and passed by reference.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub files: Vec<PathBuf>,
    pub pattern: String,
    pub output: PathBuf,
    pub missing_token: String,
    pub index_mode: IndexMode,
    pub skip_special: bool,
    pub verbose: bool,
    pub debug: bool,
}

impl InputConfig {
    ///
    /// Parses command-line arguments and resolves them into a `RunConfig`.
    ///
    /// # Errors
    /// Returns an error if the resolved configuration is invalid.
    pub fn build() -> Result<RunConfig> {
        let input_config = InputConfig::parse();
        RunConfig::from_input(input_config)
    }
}

impl RunConfig {
    /// Layers the command-line values over the embedded defaults.
    pub fn from_input(input: InputConfig) -> Result<RunConfig> {
        let defaults = Defaults::load()?;

        let pattern = input.pattern.unwrap_or(defaults.pattern);
        if pattern.is_empty() {
            return Err(CombineError::Config(
                "sample name pattern must not be empty".to_string(),
            ));
        }

        let output = input.output.unwrap_or(defaults.output);
        if output.is_empty() {
            return Err(CombineError::Config(
                "output path must not be empty".to_string(),
            ));
        }

        if input.files.is_empty() {
            return Err(CombineError::Config(
                "at least one input file is required".to_string(),
            ));
        }

        Ok(RunConfig {
            files: input.files.into_iter().map(PathBuf::from).collect(),
            pattern,
            output: PathBuf::from(output),
            missing_token: input.missing_token.unwrap_or(defaults.missing_token),
            index_mode: input.index.unwrap_or(defaults.index_mode),
            skip_special: input.skip_special,
            verbose: input.verbose,
            debug: input.debug,
        })
    }

    /// Configuration with the built-in defaults for the given input files.
    pub fn with_files(files: Vec<PathBuf>) -> Result<RunConfig> {
        let defaults = Defaults::load()?;
        Ok(RunConfig {
            files,
            pattern: defaults.pattern,
            output: PathBuf::from(defaults.output),
            missing_token: defaults.missing_token,
            index_mode: defaults.index_mode,
            skip_special: false,
            verbose: false,
            debug: false,
        })
    }
}
