use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod bootstrap;
mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "hpm")]
#[command(about = "Hawkins Persona Matrix - reimagine specimens as temporal variants", long_about = None)]
struct Cli {
    /// Path to config.toml (secret.json is read from the same directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session whose uploaded specimens to use
    #[arg(long, global = true, default_value = "default")]
    session: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in and uploaded specimens
    Roster,
    /// Ingest all specimens, regenerate them and export the results
    Run {
        /// Where to write exported portraits
        #[arg(long)]
        export_dir: Option<PathBuf>,
        /// Stop after ingest
        #[arg(long)]
        no_batch: bool,
    },
    /// Regenerate a single specimen
    Regenerate {
        /// Item id (a built-in name or a custom-... id)
        id: String,
        /// Theme word to build the persona around
        #[arg(long)]
        modifier: Option<String>,
        /// Where to write the exported portrait
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    /// Upload an image as a custom specimen
    Add {
        image_path: PathBuf,
        /// Display name of the specimen
        #[arg(long)]
        name: String,
    },
    /// Remove a custom specimen
    Remove { id: String },
    /// Drop every uploaded specimen of the session
    ClearSession,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init_logging();
    let config = cli.config.as_deref();
    let session = cli.session.as_str();

    match cli.command {
        Commands::Roster => commands::roster::run(session).await?,
        Commands::Run {
            export_dir,
            no_batch,
        } => commands::run::run(config, session, export_dir, no_batch).await?,
        Commands::Regenerate {
            id,
            modifier,
            export_dir,
        } => {
            commands::regenerate::run(config, session, &id, modifier.as_deref(), export_dir)
                .await?
        }
        Commands::Add { image_path, name } => {
            commands::specimen::add(config, session, &image_path, &name).await?
        }
        Commands::Remove { id } => commands::specimen::remove(config, session, &id).await?,
        Commands::ClearSession => commands::session::clear(session).await?,
    }

    Ok(())
}
