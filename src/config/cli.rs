use clap::Parser;
use std::path::PathBuf;

/// Command line flags. All of them are optional: without `--config` the
/// job reads its settings from environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "weather-etl")]
#[command(about = "Fetch current weather, archive it to the data lake and load it into the warehouse")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
