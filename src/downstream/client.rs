//! HTTP implementation of [`Downstream`].
//!
//! # Responsibilities
//! - Build `base/resource` requests with the descriptor's verb
//! - Attach the payload as a JSON body for POST
//! - Stop waiting as soon as the deadline context fires
//! - Classify failures into transport, remote and cancelled
//!
//! # Design Decisions
//! - No retries; one descriptor is exactly one outbound request
//! - Connection pool shared across orchestrations (reqwest `Client` is a handle)

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::config::TimeoutConfig;
use crate::downstream::descriptor::{CallDescriptor, CallMethod};
use crate::downstream::error::CallError;
use crate::downstream::{CallValue, Downstream};
use crate::orchestration::deadline::DeadlineContext;

/// Calls downstream endpoints over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDownstream {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpDownstream {
    /// Create a client against a resolved base address.
    pub fn new(base_url: Url, timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
            .no_proxy()
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    async fn exchange(&self, descriptor: &CallDescriptor) -> Result<CallValue, CallError> {
        let resource = descriptor.resource();
        let url = self
            .base_url
            .join(resource)
            .map_err(|e| CallError::Transport {
                resource: resource.to_string(),
                message: format!("invalid resource path: {}", e),
            })?;

        let mut request = match descriptor.method() {
            CallMethod::Get => self.client.get(url),
            CallMethod::Post => self.client.post(url),
        };
        if let Some(payload) = descriptor.payload() {
            request = request.json(payload);
        }

        let transport = |e: reqwest::Error| CallError::Transport {
            resource: resource.to_string(),
            message: e.to_string(),
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(CallError::Remote {
                resource: resource.to_string(),
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.canonical_reason().unwrap_or("error status").to_string()
                } else {
                    body
                },
            });
        }

        serde_json::from_str::<CallValue>(&body).map_err(|e| CallError::Decode {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl Downstream for HttpDownstream {
    async fn call(
        &self,
        descriptor: &CallDescriptor,
        deadline: &DeadlineContext,
    ) -> Result<CallValue, CallError> {
        tracing::debug!(
            method = %descriptor.method(),
            resource = descriptor.resource(),
            remaining_ms = deadline.remaining().as_millis() as u64,
            "Calling downstream"
        );

        tokio::select! {
            biased;
            _ = deadline.cancelled() => Err(CallError::cancelled(descriptor.resource())),
            result = self.exchange(descriptor) => result,
        }
    }
}
