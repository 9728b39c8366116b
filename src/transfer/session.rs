use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use russh::client::{self, Handle};
use russh::keys::PublicKey;
use russh::Disconnect;
use russh_sftp::client::SftpSession;
use secrecy::SecretString;

use super::auth;

/// Ceiling for TCP connect, SSH handshake and authentication combined.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Where exports are uploaded to. Immutable for the lifetime of the process.
#[derive(Debug)]
pub struct RemoteTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub credential: Credential,
    pub remote_directory: String,
}

/// Password, optionally preceded by a private key tried first.
#[derive(Debug)]
pub struct Credential {
    pub password: Option<SecretString>,
    pub key_file: Option<PathBuf>,
}

/// SSH client handler for russh — carries host info for key verification.
pub(super) struct SshHandler {
    host: String,
    port: u16,
}

impl SshHandler {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }
}

impl client::Handler for SshHandler {
    type Error = anyhow::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        use russh::keys::known_hosts;

        match known_hosts::check_known_hosts(&self.host, self.port, server_public_key) {
            Ok(true) => {
                tracing::debug!("Host key verified for {}:{}", self.host, self.port);
                Ok(true)
            }
            Ok(false) => {
                // TOFU: first time seeing this host — learn the key
                tracing::info!(
                    "New host key for {}:{}, adding to known_hosts",
                    self.host,
                    self.port
                );
                if let Err(e) =
                    known_hosts::learn_known_hosts(&self.host, self.port, server_public_key)
                {
                    tracing::warn!("Failed to save host key to known_hosts: {}", e);
                }
                Ok(true)
            }
            Err(russh::keys::Error::KeyChanged { line }) => Err(anyhow!(
                "HOST KEY VERIFICATION FAILED for {}:{}. \
                 The server's key has changed since it was last recorded \
                 (known_hosts line {}). Refusing to upload. If the server was \
                 legitimately reinstalled, remove line {} from ~/.ssh/known_hosts.",
                self.host,
                self.port,
                line,
                line
            )),
            Err(e) => {
                tracing::warn!(
                    "Could not verify host key for {}:{}: {}. Accepting.",
                    self.host,
                    self.port,
                    e
                );
                Ok(true)
            }
        }
    }
}

/// One authenticated SSH session, scoped to a single upload.
pub(super) struct RemoteSession {
    handle: Handle<SshHandler>,
}

impl RemoteSession {
    /// Connect and authenticate, bounded by [`CONNECT_TIMEOUT_SECS`].
    pub async fn open(target: &RemoteTarget) -> Result<Self> {
        tracing::info!(
            "Connecting to {}@{}:{}",
            target.username,
            target.host,
            target.port
        );

        let config = Arc::new(client::Config::default());
        let handler = SshHandler::new(target.host.clone(), target.port);

        let establish = async {
            let mut handle =
                client::connect(config, (target.host.as_str(), target.port), handler)
                    .await
                    .context("Failed to connect to SSH server")?;
            auth::authenticate(&mut handle, target).await?;
            Ok::<_, anyhow::Error>(handle)
        };

        let handle = tokio::time::timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS), establish)
            .await
            .map_err(|_| {
                anyhow!(
                    "Timed out connecting to {}:{} ({CONNECT_TIMEOUT_SECS}s)",
                    target.host,
                    target.port
                )
            })??;

        tracing::debug!("SSH session established");
        Ok(Self { handle })
    }

    /// Open a channel and start the SFTP subsystem on it.
    pub async fn open_sftp(&self) -> Result<SftpSession> {
        let channel = self
            .handle
            .channel_open_session()
            .await
            .context("Failed to open channel")?;

        channel
            .request_subsystem(true, "sftp")
            .await
            .context("Failed to request SFTP subsystem")?;

        SftpSession::new(channel.into_stream())
            .await
            .context("Failed to initialize SFTP session")
    }

    /// Disconnect. Errors are logged, not returned: the session is gone
    /// either way.
    pub async fn close(self) {
        if let Err(e) = self
            .handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
        {
            tracing::debug!("Error while disconnecting: {}", e);
        }
    }
}
