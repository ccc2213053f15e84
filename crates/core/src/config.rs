//! Configuration file handling
//!
//! slc reads a TOML file with one `[environment.<name>]` table per target
//! deployment plus optional operation-parameter sections. The file is
//! located via `--config`, the `SLC_CONFIG` environment variable,
//! `./slc.toml`, or `<config dir>/slc/config.toml`, in that order.
//!
//! ```toml
//! [environment.nonprod]
//! endpoint = "http://localhost:9000"
//! access_key = "minioadmin"
//! secret_key = "minioadmin"
//!
//! [retry]
//! max_attempts = 3
//!
//! [upload]
//! bucket = "demo"
//! object = "report.pdf"
//! file = "/tmp/report.pdf"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "SLC_CONFIG";

const CONFIG_FILE: &str = "slc.toml";

fn default_region() -> String {
    "us-west-2".to_string()
}

/// Connection settings for one named target deployment.
#[derive(Clone, Deserialize)]
pub struct Environment {
    /// Endpoint URL of the S3-compatible service
    pub endpoint: String,
    /// Access key for the service
    pub access_key: String,
    /// Secret key for the service
    pub secret_key: String,
    /// Signing region; the service itself ignores it for most
    /// S3-compatible deployments
    #[serde(default = "default_region")]
    pub region: String,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("endpoint", &self.endpoint)
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// Retry tuning for the transport layer.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10_000,
        }
    }
}

/// Defaults applied when creating buckets.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct BucketDefaults {
    /// Enable versioning on newly created buckets
    pub versioning: bool,
}

/// Default parameters for `put` when flags are omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadDefaults {
    pub bucket: String,
    pub object: String,
    pub file: PathBuf,
}

/// Default parameters for `get` when flags are omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadDefaults {
    pub bucket: String,
    pub object: String,
    pub version_id: Option<String>,
    pub file: Option<PathBuf>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environment: BTreeMap<String, Environment>,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub bucket: BucketDefaults,
    pub upload: Option<UploadDefaults>,
    pub download: Option<DownloadDefaults>,
}

impl Config {
    /// Load the configuration, resolving the file location from the
    /// explicit path, `SLC_CONFIG`, the working directory, or the user
    /// config directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::locate()?,
        };

        let text = std::fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;

        Self::parse(&text)
            .map_err(|e| Error::Config(format!("invalid config file {}: {e}", path.display())))
    }

    fn locate() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Ok(local);
        }

        if let Some(dir) = dirs::config_dir() {
            let path = dir.join("slc").join("config.toml");
            if path.exists() {
                return Ok(path);
            }
        }

        Err(Error::Config(format!(
            "no config file found; create ./{CONFIG_FILE} or pass --config"
        )))
    }

    fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Look up a named environment.
    pub fn environment(&self, name: &str) -> Result<&Environment> {
        self.environment.get(name).ok_or_else(|| {
            Error::Config(format!("environment '{name}' is not configured"))
        })
    }
}
