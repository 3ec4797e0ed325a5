//! Aletheia CLI - utility for initializing and reliably tailing audit logs.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aletheia=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tail(args) => commands::tail::run(&args).await,
        Commands::Init(args) => commands::init::run(&args),
        Commands::Version => {
            println!("aletheia {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
