//! Tail command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use aletheia_sink::{create_named_pipe, FileTailer};

/// Arguments for the tail command.
#[derive(Args)]
pub struct TailArgs {
    /// Audit log file to tail
    #[arg(short, long)]
    pub file: PathBuf,
}

/// Runs the tail command: creates the named pipe when missing, then copies
/// everything written to it onto stdout until interrupted.
pub async fn run(args: &TailArgs) -> Result<()> {
    create_named_pipe(&args.file)?;

    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    info!(file = %args.file.display(), "tailing audit log");

    let mut tailer = FileTailer::open(&args.file, tokio::io::stdout()).await?;
    tailer.tail(&token).await?;

    info!("audit log tail stopped");
    Ok(())
}
