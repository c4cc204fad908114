//! Application configuration.
//!
//! Configuration is stored as pretty-printed JSON in the per-user data
//! directory (see [`DataStorage`]) and can be overridden by environment
//! variables, which in turn may come from a `.env` file loaded at startup.
//!
//! ## Environment Overrides
//!
//! | Variable            | Field                |
//! |---------------------|----------------------|
//! | `YANDEX_IAM_TOKEN`  | `tracker.token`      |
//! | `YANDEX_ORG_ID`     | `tracker.org_id`     |
//! | `TRACKER_HOST`      | `tracker.host`       |
//! | `LOGIN`             | `tracker.login`      |
//! | `TRACKER_API_URL`   | `tracker.api_url`    |
//!
//! Empty values never override.
//!
//! ## Example
//!
//! ```json
//! {
//!   "tracker": {
//!     "token": "t1.9euelZq...",
//!     "org_id": "bpf3crucp1v2",
//!     "host": "https://tracker.yandex.ru",
//!     "login": "jdoe"
//!   }
//! }
//! ```

use super::data_storage::DataStorage;
use crate::api::tracker::TrackerConfig;
use crate::libs::messages::Message;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_TOKEN: &str = "YANDEX_IAM_TOKEN";
pub const ENV_ORG_ID: &str = "YANDEX_ORG_ID";
pub const ENV_HOST: &str = "TRACKER_HOST";
pub const ENV_LOGIN: &str = "LOGIN";
pub const ENV_API_URL: &str = "TRACKER_API_URL";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<TrackerConfig>,
}

impl Config {
    /// Reads the configuration file, or returns the default when none exists.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. A missing file is not an error.
    pub fn delete() -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Ok(())
    }

    /// Runs the interactive setup, prefilled from the current configuration.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        config.tracker = Some(TrackerConfig::init(&config.tracker)?);
        Ok(config)
    }

    /// Reads the configuration file and applies process environment overrides.
    pub fn load() -> Result<Self> {
        Ok(Self::read()?.apply_env())
    }

    pub fn apply_env(self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut tracker = self.tracker.take().unwrap_or_default();

        if let Some(token) = value(ENV_TOKEN) {
            tracker.token = token;
        }
        if let Some(org_id) = value(ENV_ORG_ID) {
            tracker.org_id = org_id;
        }
        if let Some(host) = value(ENV_HOST) {
            tracker.host = host;
        }
        if let Some(login) = value(ENV_LOGIN) {
            tracker.login = login;
        }
        if let Some(api_url) = value(ENV_API_URL) {
            tracker.api_url = Some(api_url);
        }

        if tracker != TrackerConfig::default() {
            self.tracker = Some(tracker);
        }
        self
    }

    /// Returns the tracker settings, failing when a required one is missing.
    pub fn tracker(&self) -> Result<&TrackerConfig> {
        let Some(tracker) = &self.tracker else {
            bail!(Message::ConfigTrackerMissing);
        };

        let required = [(ENV_TOKEN, &tracker.token), (ENV_ORG_ID, &tracker.org_id), (ENV_HOST, &tracker.host)];
        for (key, value) in required {
            if value.trim().is_empty() {
                bail!(Message::ConfigValueMissing(key.to_string()));
            }
        }
        Ok(tracker)
    }
}
