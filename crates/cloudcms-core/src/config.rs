//! Client configuration file.
//!
//! Credentials are read from a JSON file written by the platform's API keys
//! screen:
//!
//! ```json
//! {
//!   "clientKey": "...",
//!   "clientSecret": "...",
//!   "username": "...",
//!   "password": "...",
//!   "baseURL": "https://api.cloudcms.com"
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::error::{ConfigError, Error};
use crate::types::BaseUrl;

/// File names tried by [`CloudcmsConfig::discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    "gitana.json",
    "gitana-test.json",
    "cloudcms.json",
    "cloudcms-test.json",
];

/// Connection settings for one Cloud CMS tenant.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudcmsConfig {
    #[serde(rename = "clientKey")]
    pub client_key: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    pub username: String,
    pub password: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    /// Log every request and response through the tracing observer.
    #[serde(default)]
    pub debug: bool,
}

impl CloudcmsConfig {
    /// Read and validate a config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Malformed`] if the file cannot be read or is not valid
    /// config JSON, [`ConfigError::InvalidBaseUrl`] if `baseURL` is unusable.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let malformed = |reason: String| ConfigError::Malformed {
            path: path.to_path_buf(),
            reason,
        };

        let text = fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
        let config: Self = serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?;
        config.base_url()?;
        Ok(config)
    }

    /// Load the first conventional config file found in `dir`.
    ///
    /// A malformed file stops the search; it is not skipped in favour of a
    /// later name.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref();
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Self::from_file(candidate);
            }
        }

        Err(ConfigError::NotFound {
            dir: dir.to_path_buf(),
            searched: CONFIG_FILE_NAMES.iter().map(|n| n.to_string()).collect(),
        }
        .into())
    }

    /// Load the first conventional config file in the working directory.
    pub fn load_default() -> Result<Self, Error> {
        Self::discover(".")
    }

    /// Returns the validated base URL.
    pub fn base_url(&self) -> Result<BaseUrl, Error> {
        BaseUrl::new(&self.base_url)
    }

    /// Returns the credentials for the password grant.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            &self.client_key,
            &self.client_secret,
            &self.username,
            &self.password,
        )
    }
}

impl fmt::Debug for CloudcmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudcmsConfig")
            .field("client_key", &self.client_key)
            .field("client_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("debug", &self.debug)
            .finish()
    }
}
