//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::application::services::ReportFormat;

/// Binary-search root approximation and step/time benchmarking
#[derive(Parser, Debug)]
#[command(name = "rootbench")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, env = "ROOTBENCH_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Approximate the root of a single value
    Root {
        /// Value to take the root of (may be negative)
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[command(flatten)]
        approximator: ApproximatorArgs,
    },

    /// Time the approximator on 10^(d-1)+5 for d = 1..=max-digits
    Bench {
        /// Largest digit length to test (1..=19)
        #[arg(short, long)]
        max_digits: Option<u32>,
        /// Calls per value; reported time is the mean
        #[arg(short, long)]
        repetitions: Option<u32>,
        /// Write samples to this file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        export: Option<PathBuf>,
        /// Export format (default: from file extension, then config)
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,
        #[command(flatten)]
        approximator: ApproximatorArgs,
    },

    /// Inspect settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Approximator overrides shared by `root` and `bench`.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ApproximatorArgs {
    /// Root degree (3 = cube root)
    #[arg(long)]
    pub degree: Option<u32>,
    /// Accept once |m^degree - |n|| < precision
    #[arg(long)]
    pub precision: Option<f64>,
    /// Cap on bisection steps
    #[arg(long)]
    pub max_iterations: Option<u32>,
    /// Fail when the precision is not reached
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Show the global config file path
    Path,
    /// Print a commented config template
    Template,
}
