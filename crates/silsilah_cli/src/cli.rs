use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// silsilah: resolve family sheet rows into a tree and inspect it
#[derive(Parser, Debug)]
#[command(name = "silsilah")]
#[command(about = "Resolve a family sheet into a single-rooted tree", long_about = None)]
pub struct Cli {
    /// TOML config file (missing file means defaults)
    #[arg(long, default_value = "silsilah.toml")]
    pub config: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Absolute directory for rolling log files (overrides config)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log level (overrides config)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Where rows come from; defaults to the configured endpoint.
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct SourceArgs {
    /// Read rows from a JSON export (bare array or endpoint envelope)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Fetch rows from this endpoint instead of the configured one
    #[arg(long)]
    pub url: Option<String>,

    /// Use the embedded demo dataset
    #[arg(long, default_value_t = false)]
    pub fixture: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the resolved tree
    Tree {
        /// Show spouses next to each person
        #[arg(long, default_value_t = false)]
        spouses: bool,
    },
    /// Find a member by partial name and show their detail
    Search {
        query: String,
        /// List every match instead of the first one
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Show the detail of one member by id
    Detail { id: String },
    /// Report discarded roots and shadowed names
    Check,
    /// Reload on the configured refresh interval and print the tree on change
    Watch {
        /// Stop after this many refreshes
        #[arg(long)]
        max_refreshes: Option<u32>,
    },
}

impl Cli {
    /// Parse CLI arguments from the environment
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
