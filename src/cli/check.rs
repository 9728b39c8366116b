use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::config::UploaderConfig;
use crate::transfer::SftpUploader;

use super::spinner;

pub async fn run(config_path: Option<&Path>) -> Result<u8> {
    let target = UploaderConfig::load(config_path)?.into_remote_target()?;

    println!(
        "{} Checking {}@{}:{}",
        ">".blue().bold(),
        target.username.cyan(),
        target.host.cyan(),
        target.port.to_string().cyan(),
    );

    let directory = target.remote_directory.clone();
    let uploader = SftpUploader::new(target);

    let pb = spinner::start(format!("Opening SFTP session, checking {directory}"));
    match uploader.check().await {
        Ok(()) => {
            spinner::finish_ok(&pb, &format!("Remote directory {} is reachable", directory.bold()));
            Ok(0)
        }
        Err(e) => {
            spinner::finish_failed(&pb, &format!("{e:#}"));
            Ok(1)
        }
    }
}
