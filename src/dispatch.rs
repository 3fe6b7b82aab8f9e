//! Delivery of composed messages to the webhook.
//!
//! The `Dispatcher` decides *how* a message is sent (blocking the caller or
//! detached); the `Transport` decides *where*. Each hook owns its own
//! dispatcher and transport, nothing is shared process-wide.

use crate::error::DispatchError;
use crate::message::Message;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task;
use tracing::{debug, error, info, instrument};

/// Default timeout for a single webhook exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can deliver a message, blocking until it is done.
pub trait Transport: Send + Sync {
    fn send(&self, message: &Message) -> Result<(), DispatchError>;
}

/// Posts messages as JSON to an incoming-webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookTransport {
    endpoint_url: String,
    timeout: Duration,
}

impl WebhookTransport {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Posts one message and maps a non-2xx answer to `DispatchError::Status`.
    fn post(
        client: &reqwest::blocking::Client,
        webhook_url: &str,
        message: &Message,
    ) -> Result<(), DispatchError> {
        let res = client.post(webhook_url).json(message).send().map_err(|e| {
            error!(error = %e, "Could not reach webhook");
            DispatchError::from(e)
        })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            error!(%status, %body, "Webhook answered with an error status");
            return Err(DispatchError::Status { status, body });
        }

        info!(%status, attachments = message.attachments.len(), "Message delivered");
        Ok(())
    }
}

impl Transport for WebhookTransport {
    #[instrument(skip_all, fields(channel = %message.channel))]
    fn send(&self, message: &Message) -> Result<(), DispatchError> {
        if self.endpoint_url.is_empty() {
            error!("No webhook endpoint configured, dropping message");
            return Err(DispatchError::MissingEndpoint);
        }

        // The blocking client owns an internal runtime, so it is built and
        // dropped on the sending thread rather than stored on the hook.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        Self::post(&client, &self.endpoint_url, message)
    }
}

/// Sends messages through a transport, either synchronously or fire-and-forget.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    asynchronous: bool,
    errors: Option<UnboundedSender<DispatchError>>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, asynchronous: bool) -> Self {
        Self {
            transport,
            asynchronous,
            errors: None,
        }
    }

    /// Forwards failures of detached sends to `errors` instead of dropping them.
    pub fn with_error_channel(mut self, errors: Option<UnboundedSender<DispatchError>>) -> Self {
        self.errors = errors;
        self
    }

    /// Sends `message`.
    ///
    /// In asynchronous mode this returns `Ok(())` immediately and the outcome
    /// of the send is never reported to the caller. There is no queue and no
    /// limit on the number of sends in flight.
    pub fn dispatch(&self, message: Message) -> Result<(), DispatchError> {
        if self.asynchronous {
            self.spawn_detached(message);
            Ok(())
        } else {
            self.send_blocking(&message)
        }
    }

    fn send_blocking(&self, message: &Message) -> Result<(), DispatchError> {
        let transport = &self.transport;
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::CurrentThread => {
                // block_in_place is unavailable here, so hand the send to a
                // scoped thread and wait for it.
                thread::scope(|s| {
                    s.spawn(|| transport.send(message))
                        .join()
                        .unwrap_or_else(|_| Err(DispatchError::Worker("send thread panicked".to_string())))
                })
            }
            Ok(_) => task::block_in_place(|| transport.send(message)),
            Err(_) => transport.send(message),
        }
    }

    fn spawn_detached(&self, message: Message) {
        let transport = self.transport.clone();
        let errors = self.errors.clone();
        let job = move || {
            if let Err(e) = transport.send(&message) {
                if let Some(errors) = errors {
                    let _ = errors.send(e);
                }
            }
        };

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => {
                if let Err(e) = thread::Builder::new()
                    .name("slackhook-dispatch".to_string())
                    .spawn(job)
                {
                    debug!(error = %e, "Failed to spawn dispatch thread, message dropped");
                }
            }
        }
    }
}
