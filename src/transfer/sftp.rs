//! File copy over a per-file SFTP session.

use std::future::Future;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use russh_sftp::client::SftpSession;
use russh_sftp::protocol::OpenFlags;
use tokio::io::AsyncWriteExt;

use crate::scan::TransferTask;
use crate::utils::path::remote_file_path;

use super::session::{RemoteSession, RemoteTarget};

/// Copies one local file to the remote target.
pub trait Uploader {
    /// Upload `task`, returning the number of bytes copied.
    fn upload(&self, task: &TransferTask) -> impl Future<Output = Result<u64>>;
}

/// Production uploader: a fresh SSH session for every file, always
/// disconnected before returning.
pub struct SftpUploader {
    target: RemoteTarget,
}

impl SftpUploader {
    #[must_use]
    pub fn new(target: RemoteTarget) -> Self {
        Self { target }
    }

    /// Connect, authenticate and confirm the remote directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be established or the remote
    /// directory is missing or not a directory.
    pub async fn check(&self) -> Result<()> {
        let session = RemoteSession::open(&self.target).await?;
        let result = stat_remote_directory(&session, &self.target.remote_directory).await;
        session.close().await;
        result
    }
}

impl Uploader for SftpUploader {
    async fn upload(&self, task: &TransferTask) -> Result<u64> {
        let remote_path = remote_file_path(&self.target.remote_directory, &task.remote_filename);

        let session = RemoteSession::open(&self.target).await?;
        tracing::info!("Uploading {} to {}", task.local_path.display(), remote_path);
        let result = copy_to_remote(&session, &task.local_path, &remote_path).await;
        session.close().await;

        result
    }
}

async fn copy_to_remote(
    session: &RemoteSession,
    local_path: &Path,
    remote_path: &str,
) -> Result<u64> {
    let mut local = tokio::fs::File::open(local_path)
        .await
        .with_context(|| format!("Failed to open local file {}", local_path.display()))?;

    let sftp = session.open_sftp().await?;
    let result = write_remote(&sftp, &mut local, remote_path).await;
    close_sftp(&sftp).await;
    result
}

async fn write_remote(
    sftp: &SftpSession,
    local: &mut tokio::fs::File,
    remote_path: &str,
) -> Result<u64> {
    let mut remote = sftp
        .open_with_flags(
            remote_path,
            OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE,
        )
        .await
        .with_context(|| format!("Failed to open remote file {remote_path}"))?;

    let bytes = tokio::io::copy(local, &mut remote)
        .await
        .with_context(|| format!("Failed to copy data to {remote_path}"))?;

    remote
        .shutdown()
        .await
        .with_context(|| format!("Failed to close remote file {remote_path}"))?;

    Ok(bytes)
}

async fn stat_remote_directory(session: &RemoteSession, directory: &str) -> Result<()> {
    let sftp = session.open_sftp().await?;
    let metadata = sftp.metadata(directory).await;
    close_sftp(&sftp).await;

    let metadata = metadata.with_context(|| format!("Remote directory {directory} not found"))?;
    if !metadata.is_dir() {
        return Err(anyhow!("Remote path {directory} is not a directory"));
    }
    Ok(())
}

async fn close_sftp(sftp: &SftpSession) {
    if let Err(e) = sftp.close().await {
        tracing::debug!("Error while closing SFTP session: {}", e);
    }
}
