use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use game_core::GameController;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod simulate;
mod view;

use config::{load_settings, DEFAULT_CONFIG_PATH};
use simulate::SimulationPlan;

#[derive(Parser, Debug)]
#[command(name = "whack", about = "Whack-a-Mole on a 3x3 grid in the terminal")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play interactively.
    Play,
    /// Run one scripted round without a clock and print the final state as JSON.
    Simulate {
        #[arg(long, default_value_t = 0)]
        hits: u32,
        #[arg(long, default_value_t = 15)]
        ticks: u32,
        #[arg(long)]
        restart: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (settings, warnings) = load_settings(&cli.config);

    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    for warning in warnings {
        warn!("{warning}");
    }

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => {
            let (handle, controller) =
                GameController::spawn(settings.controller_config(), settings.rng());
            info!(round_seconds = settings.round_seconds, "starting terminal session");
            view::run(handle).await?;
            controller.await.context("game controller task failed")?;
        }
        Command::Simulate {
            hits,
            ticks,
            restart,
        } => {
            let snapshot = simulate::run(
                &settings,
                SimulationPlan {
                    hits,
                    ticks,
                    restart,
                },
            );
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}
