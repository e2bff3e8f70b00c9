use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use ned2oc::translate::Feature;

#[derive(Parser, Debug)]
#[command(name = "ned2oc")]
#[command(about = "Translate IOS-XE NED JSON configuration into OpenConfig JSON")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Translate one device configuration and write the results.
    Translate(TranslateArgs),
    /// Show which source paths a leftover consumed.
    Coverage(CoverageArgs),
    /// Check an OpenConfig service for families not supported on IOS-XR.
    CheckXr(CheckXrArgs),
}

#[derive(Parser, Debug)]
pub struct TranslateArgs {
    /// NED JSON configuration, optionally wrapped in `tailf-ncs:config`.
    pub input: PathBuf,
    /// Directory for the generated files.
    #[arg(short, long)]
    pub output_dir: PathBuf,
    /// Device name used as the output file prefix. Defaults to the input file stem.
    #[arg(long)]
    pub device: Option<String>,
    /// Feature family to translate; repeatable. Defaults to all.
    #[arg(long = "feature", value_enum)]
    pub features: Vec<FeatureArg>,
    /// Mapping tables TOML overriding the embedded ones.
    #[arg(long)]
    pub mappings_file: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Fail if any note was recorded.
    #[arg(long)]
    pub strict: bool,
    /// Write the leftover with `null` tombstones instead of compacting it.
    #[arg(long)]
    pub keep_tombstones: bool,
}

#[derive(Parser, Debug)]
pub struct CoverageArgs {
    /// Source configuration.
    pub before: PathBuf,
    /// Leftover written by `translate --keep-tombstones`, so list indices
    /// still line up with the source.
    pub leftover: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Only print the counts.
    #[arg(long)]
    pub summary: bool,
    /// Also list paths that were not consumed.
    #[arg(long)]
    pub remaining: bool,
    /// Stop descending below this depth.
    #[arg(long)]
    pub max_depth: Option<u32>,
    /// Paths or key names to skip.
    #[arg(long)]
    pub ignore: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct CheckXrArgs {
    /// OpenConfig service JSON.
    pub file: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum FeatureArg {
    Acl,
    NetworkInstances,
}

impl From<FeatureArg> for Feature {
    fn from(arg: FeatureArg) -> Self {
        match arg {
            FeatureArg::Acl => Feature::Acl,
            FeatureArg::NetworkInstances => Feature::NetworkInstances,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
