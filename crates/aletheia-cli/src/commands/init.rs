//! Init command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use aletheia_sink::create_named_pipe;

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Audit log file to initialize
    #[arg(short, long)]
    pub file: PathBuf,
}

/// Creates the audit log named pipe so a later tail (or an audited
/// service) finds it ready. Useful in an init container; safe to run
/// repeatedly.
pub fn run(args: &InitArgs) -> Result<()> {
    create_named_pipe(&args.file)?;
    println!("Created named pipe {}", args.file.display());
    Ok(())
}
