use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{import, prefs, replay, store};

#[derive(Parser)]
#[command(name = "idfill", version, about = "Identifier-driven form autofill tools")]
struct Cli {
    /// Config file; falls back to IDFILL_CONFIG, then configs/default.toml
    #[arg(long, global = true, env = "IDFILL_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the record store with the rows of a comma-separated file
    Import(import::ImportArgs),
    /// Report whether records are loaded
    Status(store::StatusArgs),
    /// List records whose identifier ends like the given one
    Lookup(store::LookupArgs),
    /// Show or change the remembered fill defaults
    Prefs {
        #[command(subcommand)]
        cmd: prefs::PrefsCmd,
    },
    /// Run the fill engine against a page snapshot (JSON)
    Replay(replay::ReplayArgs),
    /// Print or write the config JSON schema
    Schema(SchemaArgs),
}

#[derive(clap::Args)]
struct SchemaArgs {
    /// Write to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    idfill_otel::init();
    let cli = Cli::parse();
    let cfg = commands::load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Import(args) => import::run(&cfg, args).await,
        Commands::Status(args) => store::status(&cfg, args),
        Commands::Lookup(args) => store::lookup(&cfg, args).await,
        Commands::Prefs { cmd } => prefs::run(&cfg, cmd),
        Commands::Replay(args) => replay::run(&cfg, args).await,
        Commands::Schema(args) => match args.out {
            Some(path) => {
                idfill_core::config::write_schema_file(&path)?;
                println!("wrote {}", path.display());
                Ok(())
            }
            None => {
                let schema = idfill_core::config::config_schema_json();
                println!("{}", serde_json::to_string_pretty(&schema)?);
                Ok(())
            }
        },
    }
}
