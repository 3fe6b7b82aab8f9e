//! slackhook - forwards structured log events to a chat webhook
//!
//! Entries pass through a fixed pipeline: disabled check, content filters,
//! field merge, field ordering, message composition and dispatch. The hook can
//! be fired directly or installed as a `tracing` layer.

pub mod config;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod fields;
pub mod filter;
pub mod hook;
pub mod layer;
pub mod message;
pub mod severity;

// Re-export the main types for convenience
pub use config::HookSettings;
pub use dispatch::{Dispatcher, Transport, WebhookTransport};
pub use entry::{Level, LogEntry};
pub use error::DispatchError;
pub use fields::Field;
pub use filter::{Filter, FilterChain, LevelSet};
pub use hook::{HookConfig, SlackHook};
pub use layer::SlackLayer;
pub use message::{Attachment, Message};
