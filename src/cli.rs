use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "hyperv-report")]
#[command(about = "Inventory Hyper-V clusters, hosts and virtual machines")]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect the full inventory and write a report
    Report(ReportArgs),

    /// Show which clusters and nodes would be inventoried
    Topology {
        /// Output format (json or yaml)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Path to a YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct ReportArgs {
    /// Directory the report is written to [default: .]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Export format (json or csv) [default: json]
    #[arg(short, long)]
    pub format: Option<String>,

    /// Abort on the first host that cannot be queried instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
