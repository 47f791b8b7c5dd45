//! Fan-out executor.
//!
//! # Responsibilities
//! - Create one deadline context per batch
//! - Spawn every call concurrently against the shared context
//! - Join all calls and return one outcome per descriptor, in order
//!
//! # Design Decisions
//! - Join barrier, not a race: a failed call never cancels its siblings
//! - The executor itself races each call against the context, so a
//!   downstream that ignores cancellation still settles as `Cancelled`
//! - A panicked task becomes a failed outcome in its own slot

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::downstream::{CallDescriptor, CallError, CallValue, Downstream};
use crate::observability::metrics;
use crate::orchestration::deadline::{DeadlineContext, DeadlineError};

/// Terminal result of one downstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    pub resource: String,
    pub result: Result<CallValue, CallError>,
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn value(&self) -> Option<CallValue> {
        self.result.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&CallError> {
        self.result.as_ref().err()
    }
}

/// Batch-level failure: no per-call outcomes are produced.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("no calls to dispatch")]
    EmptyBatch,

    #[error("failed to create deadline context: {0}")]
    Deadline(#[from] DeadlineError),
}

/// Runs a batch of calls concurrently under one shared deadline.
#[derive(Clone)]
pub struct FanOut {
    downstream: Arc<dyn Downstream>,
    deadline: Duration,
}

impl FanOut {
    pub fn new(downstream: Arc<dyn Downstream>, deadline: Duration) -> Self {
        Self {
            downstream,
            deadline,
        }
    }

    /// Run every descriptor and collect exactly one outcome per descriptor.
    ///
    /// Outcome `i` always belongs to descriptor `i`, whatever order the
    /// calls complete in.
    pub async fn run_all(
        &self,
        descriptors: Vec<CallDescriptor>,
    ) -> Result<Vec<CallOutcome>, OrchestrationError> {
        if descriptors.is_empty() {
            return Err(OrchestrationError::EmptyBatch);
        }

        let (ctx, guard) = DeadlineContext::new(self.deadline)?;

        tracing::debug!(
            calls = descriptors.len(),
            deadline_ms = self.deadline.as_millis() as u64,
            "Dispatching calls"
        );

        let slots: Vec<_> = descriptors
            .into_iter()
            .map(|descriptor| {
                let resource = descriptor.resource().to_string();
                let downstream = self.downstream.clone();
                let ctx = ctx.clone();
                let handle = tokio::spawn(async move {
                    let started = Instant::now();
                    let result = tokio::select! {
                        biased;
                        result = downstream.call(&descriptor, &ctx) => result,
                        _ = ctx.cancelled() => Err(CallError::cancelled(descriptor.resource())),
                    };
                    metrics::record_call(
                        descriptor.resource(),
                        result.as_ref().err().map(CallError::kind),
                        started,
                    );
                    result
                });
                (resource, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(slots.len());
        for (resource, handle) in slots {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(CallError::Fault {
                    resource: resource.clone(),
                    message: e.to_string(),
                }),
            };
            tracing::debug!(
                resource = %resource,
                succeeded = result.is_ok(),
                "Call settled"
            );
            outcomes.push(CallOutcome { resource, result });
        }

        drop(guard);
        tracing::debug!(calls = outcomes.len(), "All calls settled");
        Ok(outcomes)
    }
}

impl std::fmt::Debug for FanOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOut")
            .field("deadline", &self.deadline)
            .finish()
    }
}
