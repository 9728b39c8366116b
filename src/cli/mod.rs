mod check;
mod show_config;
mod spinner;
mod upload;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Upload storefront order exports (.mer) to the business-system server over SFTP
#[derive(Parser, Debug)]
#[command(name = "mer-uploader")]
#[command(version, about)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Config file (default: <config dir>/mer-uploader/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only upload files whose name contains this date (YYYY-MM-DD, default: today)
    #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "all")]
    pub date: Option<String>,

    /// Upload every export in the folder regardless of date
    #[arg(long)]
    pub all: bool,

    /// Folder containing the exports (overrides the config)
    #[arg(long, value_name = "PATH")]
    pub folder: Option<PathBuf>,

    /// List the files that would be uploaded without connecting
    #[arg(long)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to the remote server and verify the upload directory
    Check,

    /// Print the effective configuration (password redacted)
    Config,
}

/// Options of the default upload run.
#[derive(Debug, Clone, Default)]
pub struct UploadArgs {
    pub date: Option<String>,
    pub all: bool,
    pub folder: Option<PathBuf>,
    pub dry_run: bool,
}

/// Dispatch the parsed command line, returning the process exit code.
///
/// # Errors
///
/// Returns an error for fatal conditions: malformed `--date`, unreadable
/// config, or incomplete remote settings when a connection is needed.
pub async fn run(cli: Cli) -> Result<u8> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Some(Command::Check) => check::run(config_path).await,

        Some(Command::Config) => {
            show_config::run(config_path)?;
            Ok(0)
        }

        None => {
            let args = UploadArgs {
                date: cli.date,
                all: cli.all,
                folder: cli.folder,
                dry_run: cli.dry_run,
            };
            upload::run(&args, config_path).await
        }
    }
}
