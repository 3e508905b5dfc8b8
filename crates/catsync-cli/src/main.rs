mod logging;
mod state;
mod sync;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "catsync-cli")]
#[command(about = "Synchronize the ERP parts catalog into a website import file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the catalog, upload new images and write the import CSV
    Sync {
        /// Plan the run and print counts without uploading or writing state
        #[arg(long)]
        dry_run: bool,

        /// Abort when the category tree has dangling or cyclic parents
        #[arg(long)]
        strict: bool,
    },
    /// Inspect or reset the processed-products snapshot
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
}

#[derive(Debug, Subcommand)]
enum StateCommands {
    /// Print how many products the last successful run recorded
    Show,
    /// Forget every processed product so the next run re-uploads all
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = catsync_core::load_app_config()?;
    let _log_guard = logging::init(&config)?;
    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Commands::Sync { dry_run, strict } => {
            let rules = catsync_core::load_rules(&config.rules_path)?;
            sync::run_sync(&config, &rules, sync::SyncOptions { dry_run, strict }).await?;
        }
        Commands::State { command } => match command {
            StateCommands::Show => state::show(&config)?,
            StateCommands::Reset => state::reset(&config)?,
        },
    }

    Ok(())
}
