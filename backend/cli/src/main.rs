mod config;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use droplink_storage::SqliteFileStore;
use droplink_telegram::{BotConfig, SharedStore};

use config::Config;

#[derive(Parser)]
#[command(name = "droplink")]
#[command(about = "Droplink — Telegram file-share link bot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot (long polling)
    Run {
        /// SQLite database path (overrides DROPLINK_DB)
        #[arg(long)]
        db: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { db } => {
            let config = Config {
                db_path: db.unwrap_or(config.db_path),
                ..config
            };
            run_bot(config).await?;
        }
    }

    Ok(())
}

async fn run_bot(config: Config) -> Result<()> {
    let token = match config.require_token() {
        Ok(token) => token,
        Err(e) => {
            error!("DROPLINK_BOT_TOKEN not set; refusing to start");
            return Err(e);
        }
    };

    info!(db = %config.db_path, "Starting Droplink");

    let store: SharedStore = Arc::new(SqliteFileStore::open(&config.db_path)?);
    let bot_config = BotConfig {
        token,
        admin_id: config.admin_id,
    };
    droplink_telegram::run(bot_config, store).await
}
