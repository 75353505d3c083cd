// src/config.rs

//! Runtime configuration for the three functions.
//!
//! Each component receives an explicit config struct at construction;
//! the environment is only read inside the `from_env` constructors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable naming the inventory table.
///
/// The name is set by the provisioning stack and is kept verbatim.
pub const ENV_COMPONENTS_TABLE: &str = "components_table";

/// Environment variable naming the notification topic.
pub const ENV_TOPIC_ARN: &str = "topic_arn";

/// Optional override for the polling User-Agent.
pub const ENV_USER_AGENT: &str = "USER_AGENT";

/// Optional override for the HTTP timeout in seconds.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";

/// Optional override for the seed dataset path.
pub const ENV_SEED_PATH: &str = "SEED_PATH";

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header identifying the poller to vendor sites
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

impl HttpConfig {
    /// Read overrides from the environment on top of defaults.
    fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(agent) = std::env::var(ENV_USER_AGENT) {
            if !agent.trim().is_empty() {
                config.user_agent = agent;
            }
        }

        if let Ok(timeout) = std::env::var(ENV_HTTP_TIMEOUT_SECS) {
            if let Ok(secs) = timeout.parse() {
                config.timeout_secs = secs;
            }
        }

        config
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Configuration for the availability poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Inventory table holding the component records
    pub table_name: String,

    /// HTTP client settings for page fetches
    pub http: HttpConfig,
}

impl PollerConfig {
    /// Build poller configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let table_name = require_env(ENV_COMPONENTS_TABLE)?;
        let config = Self {
            table_name,
            http: HttpConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(AppError::validation("table_name is empty"));
        }
        self.http.validate()
    }
}

/// Configuration for the change notifier.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Destination topic for restock notifications
    pub topic_arn: String,
}

impl NotifierConfig {
    /// Build notifier configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            topic_arn: require_env(ENV_TOPIC_ARN)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.topic_arn.trim().is_empty() {
            return Err(AppError::validation("topic_arn is empty"));
        }
        Ok(())
    }
}

/// Configuration for the bootstrap seeder.
#[derive(Debug, Clone)]
pub struct SeederConfig {
    /// Path of the bundled seed dataset
    pub seed_path: PathBuf,
}

impl Default for SeederConfig {
    fn default() -> Self {
        Self {
            seed_path: defaults::seed_path(),
        }
    }
}

impl SeederConfig {
    /// Build seeder configuration from the environment.
    pub fn from_env() -> Self {
        let seed_path = std::env::var(ENV_SEED_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| defaults::seed_path());
        Self { seed_path }
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| AppError::config(format!("Missing environment variable: {name}")))
}

mod defaults {
    use std::path::PathBuf;

    pub fn user_agent() -> String {
        "stockwatch/1.0".into()
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn seed_path() -> PathBuf {
        PathBuf::from("data/seed.toml")
    }
}
