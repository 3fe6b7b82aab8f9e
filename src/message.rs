//! The outbound webhook payload and how it is built from an entry.

use crate::entry::{Level, LogEntry};
use crate::fields::{self, Field};
use crate::hook::HookConfig;
use crate::severity::color_for;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Attachment text used when the entry carries fields; the message moves to the pretext.
pub const FIELDS_HEADER: &str = "Message fields";

/// An entry with the hook's extra fields folded in. Lives for one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedEntry {
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub fields: HashMap<String, Value>,
}

impl MergedEntry {
    pub fn new(entry: &LogEntry, extra_fields: &HashMap<String, Value>) -> Self {
        Self {
            level: entry.level,
            message: entry.message.clone(),
            timestamp: entry.timestamp,
            fields: fields::merge(extra_fields, &entry.data),
        }
    }
}

/// The JSON document posted to the webhook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub username: String,
    pub channel: String,
    pub icon_emoji: String,
    pub icon_url: String,
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// The single attachment every composed message carries.
    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachments.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub text: String,
    pub pretext: String,
    pub fallback: String,
    pub color: String,
    pub fields: Vec<Field>,
}

/// Builds the outbound message for an entry whose fields are already ordered.
pub fn compose(config: &HookConfig, entry: &MergedEntry, fields: Vec<Field>) -> Message {
    let (text, pretext) = if fields.is_empty() {
        (entry.message.clone(), String::new())
    } else {
        (FIELDS_HEADER.to_string(), entry.message.clone())
    };

    let attachment = Attachment {
        text,
        pretext,
        fallback: entry.message.clone(),
        color: color_for(entry.level).to_string(),
        fields,
    };

    Message {
        username: config.username.clone(),
        channel: config.channel.clone(),
        icon_emoji: config.icon_emoji.clone(),
        icon_url: config.icon_url.clone(),
        attachments: vec![attachment],
    }
}
