use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::config::UploaderConfig;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => UploaderConfig::config_path()?,
    };
    let config = UploaderConfig::load(Some(&path))?;

    let origin = if path.exists() { "" } else { " (not found, defaults + environment)" };
    println!(
        "{} {}{}",
        "config:".dimmed(),
        path.display().to_string().underline(),
        origin.dimmed(),
    );

    for (key, value) in config.describe() {
        let label = format!("{:<18}", format!("{key}:"));
        println!("  {} {}", label.dimmed(), value.cyan());
    }

    Ok(())
}
