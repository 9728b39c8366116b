use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::config::UploaderConfig;
use crate::scan::{self, TransferTask};
use crate::transfer::SftpUploader;
use crate::upload::{self, BatchSummary};

use super::UploadArgs;

pub async fn run(args: &UploadArgs, config_path: Option<&Path>) -> Result<u8> {
    // Resolved before anything else so a bad --date never reaches the network
    let date_token = upload::resolve_date_token(args.date.as_deref(), args.all)?;

    let config = UploaderConfig::load(config_path)?;
    let folder = args
        .folder
        .clone()
        .unwrap_or_else(|| config.source_folder());

    let extension = config.source.extension.as_str();

    tracing::info!("Searching for .{} files in: {}", extension, folder.display());
    let tasks = scan::find_transfer_tasks(&folder, extension, date_token.as_deref());

    if tasks.is_empty() {
        match &date_token {
            Some(token) => tracing::warn!("No .{} files found for date: {}", extension, token),
            None => tracing::warn!("No .{} files found", extension),
        }
        return Ok(0);
    }

    tracing::info!("Found {} file(s) to upload", tasks.len());

    if args.dry_run {
        print_plan(&tasks);
        return Ok(0);
    }

    let uploader = SftpUploader::new(config.into_remote_target()?);
    let summary = upload::upload_all(&uploader, &tasks).await;
    print_summary(&summary);

    Ok(summary.exit_code())
}

fn print_plan(tasks: &[TransferTask]) {
    println!("{} Would upload {} file(s):", ">".blue().bold(), tasks.len());
    for task in tasks {
        println!("  {}", task.local_path.display().to_string().cyan());
    }
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("{}", "Upload summary".bold());
    println!(
        "  {} {}",
        "successful:".dimmed(),
        summary.success_count().to_string().green()
    );
    println!(
        "  {}     {}",
        "failed:".dimmed(),
        summary.failure_count().to_string().red()
    );

    for (name, error) in &summary.failed {
        println!("  {} {}: {}", "x".red(), name.bold(), error.dimmed());
    }
}
