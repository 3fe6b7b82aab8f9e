//! Loadable settings for a hook.
//!
//! `HookSettings` holds every part of a `HookConfig` that can be written down
//! in a file. It uses the `figment` crate to layer defaults, an optional TOML
//! file and `SLACKHOOK_` environment variables. Filters and the async error
//! channel only exist in code and are added to the resulting `HookConfig`.

use crate::dispatch::DEFAULT_TIMEOUT;
use crate::entry::Level;
use crate::hook::HookConfig;
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `SLACKHOOK_CHANNEL=#ops`.
pub const ENV_PREFIX: &str = "SLACKHOOK_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct HookSettings {
    /// The incoming webhook URL.
    pub endpoint_url: String,
    pub icon_url: String,
    pub channel: String,
    pub icon_emoji: String,
    pub username: String,
    /// Send without blocking the logging call site.
    pub asynchronous: bool,
    pub disabled: bool,
    pub sort_fields: bool,
    pub sort_priorities: HashMap<String, i64>,
    /// Levels to forward. Empty forwards everything.
    pub accepted_levels: Vec<Level>,
    /// Static fields added to every message.
    pub extra_fields: HashMap<String, Value>,
    /// Timeout for a single webhook exchange, in seconds.
    pub timeout_seconds: u64,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            icon_url: String::new(),
            channel: String::new(),
            icon_emoji: String::new(),
            username: String::new(),
            asynchronous: false,
            disabled: false,
            sort_fields: false,
            sort_priorities: HashMap::new(),
            accepted_levels: Vec::new(),
            extra_fields: HashMap::new(),
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl HookSettings {
    /// Loads settings by layering defaults, the TOML file at `path` (if any)
    /// and environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(HookSettings::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        // Allow overriding with environment variables, e.g., SLACKHOOK_DISABLED=true
        let settings: HookSettings = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values that would make every send fail.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            bail!("timeout_seconds must be at least 1");
        }
        Ok(())
    }

    pub fn into_config(self) -> HookConfig {
        HookConfig {
            accepted_levels: self.accepted_levels.into_iter().collect(),
            endpoint_url: self.endpoint_url,
            icon_url: self.icon_url,
            channel: self.channel,
            icon_emoji: self.icon_emoji,
            username: self.username,
            asynchronous: self.asynchronous,
            extra_fields: self.extra_fields,
            disabled: self.disabled,
            sort_fields: self.sort_fields,
            sort_priorities: self.sort_priorities,
            timeout: Duration::from_secs(self.timeout_seconds),
            ..HookConfig::default()
        }
    }
}

impl From<HookSettings> for HookConfig {
    fn from(settings: HookSettings) -> Self {
        settings.into_config()
    }
}
