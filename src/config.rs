use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::transfer::{Credential, RemoteTarget};
use crate::utils::path::expand_tilde;

pub const ENV_HOST: &str = "MER_UPLOADER_HOST";
pub const ENV_PORT: &str = "MER_UPLOADER_PORT";
pub const ENV_USERNAME: &str = "MER_UPLOADER_USERNAME";
pub const ENV_PASSWORD: &str = "MER_UPLOADER_PASSWORD";
pub const ENV_KEY_FILE: &str = "MER_UPLOADER_KEY_FILE";
pub const ENV_REMOTE_DIR: &str = "MER_UPLOADER_REMOTE_DIR";
pub const ENV_SOURCE_DIR: &str = "MER_UPLOADER_SOURCE_DIR";

/// Extension of storefront order exports.
pub const DEFAULT_EXTENSION: &str = "mer";

/// Settings loaded from `config.toml`, then overridden from the environment.
#[derive(Debug, Default, Deserialize)]
pub struct UploaderConfig {
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub source: SourceSettings,
}

#[derive(Debug, Deserialize)]
pub struct RemoteSettings {
    pub host: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Raw `MER_UPLOADER_PORT`, validated only when a connection is needed.
    #[serde(skip)]
    pub port_override: Option<String>,
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub password: Option<SecretString>,
    pub key_file: Option<String>,
    pub remote_directory: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SourceSettings {
    pub folder: Option<String>,
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
            port_override: None,
            username: None,
            password: None,
            key_file: None,
            remote_directory: None,
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            folder: None,
            extension: default_extension(),
        }
    }
}

fn default_port() -> u16 {
    22
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl UploaderConfig {
    /// Load the config file (if any) and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };
        let mut config = Self::load_file(&path)?;
        config.apply_env_with(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a config file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Default config location: `<config_dir>/mer-uploader/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform config directory is unknown.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("mer-uploader").join("config.toml"))
    }

    /// Override settings from `lookup`, which maps a variable name to its value.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.remote.host = Some(host);
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.remote.port_override = Some(port);
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            self.remote.username = Some(username);
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.remote.password = Some(SecretString::from(password));
        }
        if let Some(key_file) = lookup(ENV_KEY_FILE) {
            self.remote.key_file = Some(key_file);
        }
        if let Some(dir) = lookup(ENV_REMOTE_DIR) {
            self.remote.remote_directory = Some(dir);
        }
        if let Some(folder) = lookup(ENV_SOURCE_DIR) {
            self.source.folder = Some(folder);
        }
    }

    /// Folder scanned for exports: configured value, else the user's
    /// downloads directory.
    #[must_use]
    pub fn source_folder(&self) -> PathBuf {
        if let Some(folder) = &self.source.folder {
            return PathBuf::from(expand_tilde(folder));
        }
        dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
            .unwrap_or_else(|| PathBuf::from("Downloads"))
    }

    /// Validate the remote settings and build the upload target.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing setting, or if the port
    /// override is not a valid port number.
    pub fn into_remote_target(self) -> Result<RemoteTarget> {
        let remote = self.remote;
        let port = match &remote.port_override {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid {ENV_PORT}: {raw}"))?,
            None => remote.port,
        };
        let host = required(remote.host, "remote.host", ENV_HOST)?;
        let username = required(remote.username, "remote.username", ENV_USERNAME)?;
        let remote_directory = required(
            remote.remote_directory,
            "remote.remote_directory",
            ENV_REMOTE_DIR,
        )?;

        if remote.password.is_none() && remote.key_file.is_none() {
            return Err(anyhow!(
                "No credential configured: set remote.password or remote.key_file \
                 (or {ENV_PASSWORD} / {ENV_KEY_FILE})"
            ));
        }

        Ok(RemoteTarget {
            host,
            port,
            username,
            credential: Credential {
                password: remote.password,
                key_file: remote.key_file.map(|p| PathBuf::from(expand_tilde(&p))),
            },
            remote_directory,
        })
    }

    /// Human-readable dump of the effective settings. The password is
    /// never included.
    #[must_use]
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let unset = || "(unset)".to_string();
        let remote = &self.remote;
        vec![
            ("host", remote.host.clone().unwrap_or_else(unset)),
            (
                "port",
                remote
                    .port_override
                    .clone()
                    .unwrap_or_else(|| remote.port.to_string()),
            ),
            ("username", remote.username.clone().unwrap_or_else(unset)),
            (
                "password",
                match &remote.password {
                    Some(p) if !p.expose_secret().is_empty() => "********".to_string(),
                    _ => unset(),
                },
            ),
            ("key_file", remote.key_file.clone().unwrap_or_else(unset)),
            (
                "remote_directory",
                remote.remote_directory.clone().unwrap_or_else(unset),
            ),
            ("source_folder", self.source_folder().display().to_string()),
            ("extension", self.source.extension.clone()),
        ]
    }
}

fn required(value: Option<String>, key: &str, env: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(anyhow!("Missing {key} in config (or {env})")),
    }
}
