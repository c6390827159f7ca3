use clap::Parser;
use std::path::PathBuf;

/// Refresh the AI Pulse page with the latest AI news.
#[derive(Debug, Parser)]
#[command(name = "pulse", version)]
pub struct Cli {
    /// YAML config file. Without it, `pulse.yaml` is used when present.
    #[arg(short, long, env = "PULSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Page to rewrite, overriding `page` from the config.
    #[arg(short, long, env = "PULSE_PAGE")]
    pub page: Option<PathBuf>,

    /// Print the updated page to stdout instead of writing it.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON.
    #[arg(long)]
    pub json_logs: bool,

    #[arg(long, env = "PULSE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}
