use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fetchqueue")]
#[command(about = "Bounded-concurrency file download scheduler", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download every manifest item that is not already up to date
    Run(RunArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// JSON manifest listing path, url and id for each file
    #[arg(long, short)]
    pub manifest: PathBuf,

    /// Configuration file (defaults to $FETCHQUEUE_CONFIG or config/fetchqueue.toml)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Destination root directory
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Number of concurrent worker lanes
    #[arg(long, short)]
    pub parallelism: Option<usize>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Proxy URL for all requests
    #[arg(long)]
    pub proxy: Option<String>,

    /// Skip assets the server answers 404 for instead of failing
    #[arg(long)]
    pub ignore_missing_assets: bool,
}

#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file (defaults to $FETCHQUEUE_CONFIG or config/fetchqueue.toml)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}
