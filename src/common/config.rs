//! Configuration file handling

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::{Error, Result};

/// Base URL of the deployment the suite was written against
pub const DEFAULT_BASE_URL: &str = "https://lostfound-fix.preview.emergentagent.com/api";

/// Main configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Root of the API; every endpoint is joined onto it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Admin account used by the login scenario
    #[serde(default)]
    pub admin: AdminAccount,

    /// Student account used by the student login scenario
    #[serde(default)]
    pub student: StudentAccount,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            admin: AdminAccount::default(),
            student: StudentAccount::default(),
            http: HttpConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Admin login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct AdminAccount {
    #[serde(default = "default_admin_username")]
    pub username: String,
    #[serde(default = "default_admin_password")]
    pub password: String,
}

impl Default for AdminAccount {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: default_admin_password(),
        }
    }
}

fn default_admin_username() -> String {
    "superadmin".to_string()
}
fn default_admin_password() -> String {
    "SuperAdmin@123".to_string()
}

/// Student login credentials (roll number plus date of birth)
#[derive(Debug, Clone, Deserialize)]
pub struct StudentAccount {
    #[serde(default = "default_roll_number")]
    pub roll_number: String,
    #[serde(default = "default_dob")]
    pub dob: String,
}

impl Default for StudentAccount {
    fn default() -> Self {
        Self {
            roll_number: default_roll_number(),
            dob: default_dob(),
        }
    }
}

fn default_roll_number() -> String {
    "CS002".to_string()
}
fn default_dob() -> String {
    "2002-08-20".to_string()
}

/// HTTP transport settings
#[derive(Debug, Default, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout. Unset means the transport default (no timeout).
    pub timeout_secs: Option<u64>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default config file is
    /// read if present, otherwise defaults are returned.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file '{}' does not exist",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        if let Some(path) = config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        if config.base_url.trim().is_empty() {
            return Err(Error::ConfigParse("base_url cannot be empty".to_string()));
        }
        Ok(config)
    }
}
