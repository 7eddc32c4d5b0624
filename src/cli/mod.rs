use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod init;
pub mod migrate;
pub mod serve;
pub mod sync;

use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Initialize the db
    Init {
        #[arg(long, action, default_value = "false")]
        db: bool,
    },
    /// Migrate the db schema
    Migrate {
        #[arg(long, action, default_value = "false")]
        db: bool,
    },
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Sync a webcal subscription for a user
    Sync {
        #[arg(long)]
        user_id: String,
        /// Feed URL, must start with webcal://
        #[arg(long)]
        url: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Init { db }) => {
            init::run(db, &config.db_path).await?;
        }
        Some(Command::Migrate { db }) => {
            migrate::run(db, &config.db_path).await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await;
        }
        Some(Command::Sync { user_id, url }) => {
            sync::run(&user_id, &url, &config).await?;
        }
        None => {}
    }

    Ok(())
}
