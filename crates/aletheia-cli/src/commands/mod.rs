//! CLI commands and argument parsing.

pub mod init;
pub mod tail;

use clap::{Parser, Subcommand};

/// Aletheia - reliable audit log tailing
#[derive(Parser)]
#[command(name = "aletheia")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Tail an audit log named pipe to stdout
    Tail(tail::TailArgs),

    /// Initialize an audit log named pipe without tailing it
    Init(init::InitArgs),

    /// Print version information
    Version,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_tail_requires_a_file() {
        assert!(Cli::try_parse_from(["aletheia", "tail"]).is_err());
    }

    #[test]
    fn test_tail_accepts_short_and_long_file_flags() {
        for argv in [
            ["aletheia", "tail", "-f", "/var/audit/events.pipe"],
            ["aletheia", "tail", "--file", "/var/audit/events.pipe"],
        ] {
            let cli = Cli::try_parse_from(argv).unwrap();
            match cli.command {
                Commands::Tail(args) => {
                    assert_eq!(args.file, PathBuf::from("/var/audit/events.pipe"));
                }
                _ => panic!("expected tail command"),
            }
        }
    }

    #[test]
    fn test_init_parses() {
        let cli = Cli::try_parse_from(["aletheia", "init", "-f", "/tmp/audit.pipe"]).unwrap();
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
