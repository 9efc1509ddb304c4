mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snowdash_core::SourceId;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "snowdash")]
#[command(about = "Mont Blanc snow conditions from the resorts' own pages")]
struct Cli {
    /// Baseline snapshot file (overrides `SNOWDASH_BASELINE_PATH`)
    #[arg(long, global = true)]
    baseline: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the live sources and print the merged snapshot as JSON
    Refresh {
        /// Only fetch these sources (repeatable); defaults to all
        #[arg(long = "source")]
        sources: Vec<SourceId>,

        #[arg(long)]
        pretty: bool,
    },
    /// Run one extractor over a saved page and print its report
    Parse {
        /// mbnr, skiinfo, les-contamines-meteo or les-contamines-ouverture
        #[arg(long)]
        source: SourceId,

        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        pretty: bool,
    },
    /// Print the validated baseline snapshot
    Baseline {
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = snowdash_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let baseline_path = cli
        .baseline
        .unwrap_or_else(|| config.baseline_path.clone());

    match cli.command {
        Commands::Refresh { sources, pretty } => {
            commands::run_refresh(&config, &baseline_path, &sources, pretty).await
        }
        Commands::Parse {
            source,
            file,
            pretty,
        } => commands::run_parse(source, &file, pretty),
        Commands::Baseline { pretty } => commands::run_baseline(&baseline_path, pretty),
    }
}
