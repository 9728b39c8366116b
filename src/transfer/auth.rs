use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use russh::client::Handle;
use russh::keys::{load_secret_key, Algorithm, HashAlg, PrivateKeyWithHashAlg, PublicKey};
use secrecy::ExposeSecret;

use super::session::{RemoteTarget, SshHandler};

/// Authenticate with the key file if one is configured and present, then
/// fall back to the password.
pub async fn authenticate(session: &mut Handle<SshHandler>, target: &RemoteTarget) -> Result<()> {
    let user = target.username.as_str();
    let mut methods_tried = Vec::new();

    if let Some(key_path) = &target.credential.key_file {
        if key_path.exists() {
            tracing::info!("Using SSH key: {}", key_path.display());
            if try_key_auth(session, user, key_path).await {
                tracing::debug!("Authenticated via {:?}", key_path);
                return Ok(());
            }
            methods_tried.push("key file");
        } else {
            tracing::warn!("Key file {} not found, skipping", key_path.display());
        }
    }

    if let Some(password) = &target.credential.password {
        let result = session
            .authenticate_password(user, password.expose_secret())
            .await
            .context("Password authentication error")?;
        if result.success() {
            tracing::debug!("Authenticated via password");
            return Ok(());
        }
        methods_tried.push("password");
    }

    if methods_tried.is_empty() {
        return Err(anyhow!("No usable credential for {user}@{}", target.host));
    }

    Err(anyhow!(
        "Authentication failed for {user}@{}. Tried: {}",
        target.host,
        methods_tried.join(", ")
    ))
}

/// Determine the best RSA hash algorithm supported by the server.
/// Returns None for non-RSA keys.
async fn rsa_hash_for_key(session: &mut Handle<SshHandler>, key: &PublicKey) -> Option<HashAlg> {
    if !matches!(key.algorithm(), Algorithm::Rsa { .. }) {
        return None;
    }

    match session.best_supported_rsa_hash().await {
        Ok(Some(hash_alg)) => {
            tracing::debug!("Server prefers RSA hash: {:?}", hash_alg);
            hash_alg
        }
        Ok(None) => {
            // Server didn't advertise, sha2-256 is the common denominator
            tracing::debug!("Server didn't advertise RSA hash preference, defaulting to SHA-256");
            Some(HashAlg::Sha256)
        }
        Err(e) => {
            tracing::debug!("Failed to query server RSA hash support: {}", e);
            Some(HashAlg::Sha256)
        }
    }
}

/// Try to authenticate with a specific key file.
async fn try_key_auth(session: &mut Handle<SshHandler>, user: &str, key_path: &Path) -> bool {
    let key = match load_secret_key(key_path, None) {
        Ok(k) => k,
        Err(e) => {
            tracing::warn!("Failed to load key {}: {}", key_path.display(), e);
            return false;
        }
    };

    let hash_alg = rsa_hash_for_key(session, key.public_key()).await;
    let key_with_alg = PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg);

    match session.authenticate_publickey(user, key_with_alg).await {
        Ok(result) if result.success() => true,
        Ok(_) => {
            tracing::debug!("Key {:?} rejected by server", key_path);
            false
        }
        Err(e) => {
            tracing::debug!("Key auth error for {:?}: {}", key_path, e);
            false
        }
    }
}
