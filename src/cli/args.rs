//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::{Point, Region};

/// Place points, watch a greedy nearest-attachment tree grow and its tour unfold
#[derive(Parser, Debug)]
#[command(name = "tspdraw")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Directory holding a local .tspdraw.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Auto-step period in milliseconds (overrides config)
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the tour for the given points
    Solve {
        /// Point as X,Y (repeatable, first one is the start)
        #[arg(short, long = "point", value_name = "X,Y", required = true, allow_hyphen_values = true)]
        points: Vec<Point>,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Build the tour for random points
    Random {
        /// Number of distinct points
        count: usize,
        /// Sampling region as X,Y,WIDTH,HEIGHT (default: from config)
        #[arg(short, long, value_name = "X,Y,W,H", allow_hyphen_values = true)]
        region: Option<Region>,
        /// Seed for reproducible points (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Interactive session reading commands from stdin
    Shell,

    /// Manage settings
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

/// How a tour run is driven and displayed.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct RunArgs {
    /// Step on the timer instead of as fast as possible
    #[arg(short, long)]
    pub auto: bool,
    /// Print the attachment tree when done
    #[arg(short, long)]
    pub tree: bool,
    /// Only print the final result
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
