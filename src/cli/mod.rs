pub mod client;
pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "quad")]
#[command(about = "QuadMeet CLI - campus events from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "API server base URL (overrides the saved session)")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse, create and join events")]
    Events {
        #[command(subcommand)]
        cmd: commands::events::EventCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server = cli.server.clone();

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, server, output_format).await,
        Commands::Events { cmd } => commands::events::handle(cmd, server, output_format).await,
    }
}
