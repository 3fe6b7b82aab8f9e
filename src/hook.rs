//! The hook wired into the logging pipeline.
//!
//! `SlackHook::fire` runs one entry through the whole pipeline:
//! disabled check, content filters, field merge, field ordering, message
//! composition and finally dispatch. Configuration is read-only once the hook
//! is built, so a single hook can be fired from many threads at once.

use crate::dispatch::{Dispatcher, Transport, WebhookTransport, DEFAULT_TIMEOUT};
use crate::entry::{Level, LogEntry};
use crate::error::DispatchError;
use crate::fields;
use crate::filter::{FilterChain, LevelSet};
use crate::message::{self, MergedEntry, Message};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Everything a hook needs to know. Only `endpoint_url` is needed for delivery;
/// leaving it empty makes every dispatch fail.
#[derive(Debug, Clone)]
pub struct HookConfig {
    /// Levels passed to the hook. Empty accepts every level.
    pub accepted_levels: LevelSet,
    pub filters: FilterChain,
    pub endpoint_url: String,
    pub icon_url: String,
    pub channel: String,
    pub icon_emoji: String,
    pub username: String,
    /// Send in a detached task instead of blocking the logging call site.
    pub asynchronous: bool,
    /// Fields attached to every message; entry fields override them.
    pub extra_fields: HashMap<String, Value>,
    pub disabled: bool,
    pub sort_fields: bool,
    /// Higher priority sorts earlier. Only used when `sort_fields` is set.
    pub sort_priorities: HashMap<String, i64>,
    /// Timeout for a single webhook exchange.
    pub timeout: Duration,
    /// Receives failures of asynchronous sends. `None` drops them.
    pub async_errors: Option<UnboundedSender<DispatchError>>,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            accepted_levels: LevelSet::all(),
            filters: FilterChain::new(),
            endpoint_url: String::new(),
            icon_url: String::new(),
            channel: String::new(),
            icon_emoji: String::new(),
            username: String::new(),
            asynchronous: false,
            extra_fields: HashMap::new(),
            disabled: false,
            sort_fields: false,
            sort_priorities: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
            async_errors: None,
        }
    }
}

impl HookConfig {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            ..Self::default()
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_icon_emoji(mut self, icon_emoji: impl Into<String>) -> Self {
        self.icon_emoji = icon_emoji.into();
        self
    }

    pub fn with_icon_url(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = icon_url.into();
        self
    }

    pub fn with_accepted_levels(mut self, levels: impl IntoIterator<Item = Level>) -> Self {
        self.accepted_levels = levels.into_iter().collect();
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&LogEntry) -> bool + Send + Sync + 'static,
    {
        self.filters.push(filter);
        self
    }

    pub fn with_extra_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_fields.insert(key.into(), value.into());
        self
    }

    pub fn with_asynchronous(mut self, asynchronous: bool) -> Self {
        self.asynchronous = asynchronous;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_sort_fields(mut self, sort_fields: bool) -> Self {
        self.sort_fields = sort_fields;
        self
    }

    pub fn with_sort_priority(mut self, title: impl Into<String>, priority: i64) -> Self {
        self.sort_priorities.insert(title.into(), priority);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_async_errors(mut self, errors: UnboundedSender<DispatchError>) -> Self {
        self.async_errors = Some(errors);
        self
    }
}

/// Forwards log entries to a chat webhook.
#[derive(Clone)]
pub struct SlackHook {
    config: Arc<HookConfig>,
    dispatcher: Dispatcher,
}

impl SlackHook {
    /// Creates a hook that posts to `config.endpoint_url`.
    pub fn new(config: HookConfig) -> Self {
        let transport =
            WebhookTransport::new(config.endpoint_url.clone()).with_timeout(config.timeout);
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a hook that delivers through a custom transport.
    pub fn with_transport(config: HookConfig, transport: Arc<dyn Transport>) -> Self {
        let dispatcher = Dispatcher::new(transport, config.asynchronous)
            .with_error_channel(config.async_errors.clone());
        Self {
            config: Arc::new(config),
            dispatcher,
        }
    }

    /// The levels this hook wants to be fired for.
    pub fn levels(&self) -> Vec<Level> {
        self.config.accepted_levels.levels()
    }

    pub fn accepts(&self, level: Level) -> bool {
        self.config.accepted_levels.contains(level)
    }

    /// Builds the message `fire` would send for `entry`, without filtering or sending.
    pub fn build_message(&self, entry: &LogEntry) -> Message {
        let merged = MergedEntry::new(entry, &self.config.extra_fields);
        let fields = fields::to_fields(
            &merged.fields,
            self.config.sort_fields,
            &self.config.sort_priorities,
        );
        message::compose(&self.config, &merged, fields)
    }

    /// Processes one entry and attempts delivery.
    ///
    /// A disabled hook or a filter veto is not an error. In asynchronous mode
    /// this returns `Ok(())` as soon as the send has been handed off.
    pub fn fire(&self, entry: &LogEntry) -> Result<(), DispatchError> {
        if self.config.disabled {
            debug!(level = %entry.level, "Hook disabled, skipping entry");
            return Ok(());
        }
        if !self.config.filters.passes(entry) {
            debug!(level = %entry.level, "Entry vetoed by filter");
            return Ok(());
        }

        let message = self.build_message(entry);
        self.dispatcher.dispatch(message)
    }
}
