//! Error types surfaced by the dispatch step.
//!
//! Every stage before dispatch (filtering, merging, sorting, composing) is
//! total, so the only failures a caller of `fire` can observe come from here.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("no webhook endpoint URL configured")]
    MissingEndpoint,

    #[error("HTTP request to webhook failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook rejected message: status {status}, body: {body}")]
    Status { status: StatusCode, body: String },

    #[error("dispatch worker failed: {0}")]
    Worker(String),
}

impl DispatchError {
    /// Returns true if the underlying HTTP exchange timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DispatchError::Http(e) if e.is_timeout())
    }
}
