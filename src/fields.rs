//! Field merging and ordering for the message attachment.

use crate::entry::render_value;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Values up to this many characters are flagged as short.
pub const SHORT_FIELD_MAX_CHARS: usize = 20;

/// A title/value pair rendered inside an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    /// Display hint: short fields may be laid out side by side.
    pub short: bool,
}

impl Field {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            title: title.into(),
            short: value.chars().count() <= SHORT_FIELD_MAX_CHARS,
            value,
        }
    }
}

/// Combines the static extra fields with an entry's own fields.
///
/// Entry fields win on key collision.
pub fn merge(extra: &HashMap<String, Value>, data: &HashMap<String, Value>) -> HashMap<String, Value> {
    let mut merged = extra.clone();
    merged.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Converts merged fields into display fields.
///
/// Without sorting the order follows the map's iteration order and is not
/// stable between calls.
pub fn to_fields(
    merged: &HashMap<String, Value>,
    sort: bool,
    priorities: &HashMap<String, i64>,
) -> Vec<Field> {
    let mut fields: Vec<Field> = merged
        .iter()
        .map(|(title, value)| Field::new(title.clone(), render_value(value)))
        .collect();

    if sort {
        sort_fields(&mut fields, priorities);
    }
    fields
}

/// Sorts fields in place: prioritised titles first (highest priority first),
/// then the rest, with ties broken by title.
pub fn sort_fields(fields: &mut [Field], priorities: &HashMap<String, i64>) {
    fields.sort_by(|a, b| compare_titles(&a.title, &b.title, priorities));
}

fn compare_titles(a: &str, b: &str, priorities: &HashMap<String, i64>) -> Ordering {
    match (priorities.get(a), priorities.get(b)) {
        (Some(pa), Some(pb)) => pb.cmp(pa).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
