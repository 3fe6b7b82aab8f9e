//! Integration with `tracing`: a subscriber layer that fires the hook.
//!
//! ```no_run
//! use slackhook::{HookConfig, SlackHook, SlackLayer};
//! use tracing_subscriber::prelude::*;
//!
//! let hook = SlackHook::new(HookConfig::new("https://hooks.slack.com/services/T/B/X"));
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(SlackLayer::new(hook))
//!     .init();
//! ```

use crate::entry::{Level, LogEntry};
use crate::hook::SlackHook;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{warn, Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Event targets never forwarded: this crate and the HTTP stack underneath it.
/// Forwarding them would let a send trigger another send.
const IGNORED_TARGETS: &[&str] = &[
    env!("CARGO_CRATE_NAME"),
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
];

/// A `tracing` layer that turns events into log entries and fires a `SlackHook`.
#[derive(Clone)]
pub struct SlackLayer {
    hook: SlackHook,
}

impl SlackLayer {
    pub fn new(hook: SlackHook) -> Self {
        Self { hook }
    }
}

fn is_ignored(target: &str) -> bool {
    IGNORED_TARGETS.iter().any(|ignored| {
        target == *ignored
            || target
                .strip_prefix(ignored)
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

impl<S: Subscriber> Layer<S> for SlackLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_ignored(metadata.target()) {
            return;
        }

        let level = Level::from(*metadata.level());
        if !self.hook.accepts(level) {
            return;
        }

        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);

        let entry = LogEntry {
            level,
            message: visitor.message,
            data: visitor.fields,
            timestamp: Utc::now(),
        };

        if let Err(e) = self.hook.fire(&entry) {
            warn!(error = %e, "Failed to forward log entry to webhook");
        }
    }
}

/// Collects the `message` field and every other field of an event.
#[derive(Default)]
struct EntryVisitor {
    message: String,
    fields: HashMap<String, Value>,
}

impl EntryVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for EntryVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.insert(field, json!(format!("{:?}", value)));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.insert(field, json!(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, json!(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, json!(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, json!(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, json!(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, json!(value.to_string()));
    }
}
