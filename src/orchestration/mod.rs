//! Orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! compose(operation, descriptors)
//!     → fanout.rs (one deadline.rs context, N concurrent calls, join)
//!     → aggregate.rs (record every failure, all-or-nothing)
//!     → Ok(values in descriptor order) | Err(generic failure)
//!
//! Per invocation:
//!     Created → Dispatched → [Pending → Succeeded | Failed | Cancelled]*
//!             → AllSettled → Aggregated → Returned
//! ```
//!
//! # Design Decisions
//! - Nothing is shared between invocations except the downstream client handle
//! - Per-call errors never escape as errors of the orchestration itself
//! - Callers get a binary outcome; detail stays in the operator log

pub mod aggregate;
pub mod bounded;
pub mod deadline;
pub mod fanout;

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::downstream::{CallDescriptor, CallValue, Downstream, ErrorKind};
use crate::observability::metrics;

pub use aggregate::{reduce, AggregateFailure, FailureRecord, FailureSink, TracingSink};
pub use bounded::{run_bounded, run_bounded_with, simulate_work, BoundedFailure, WorkError};
pub use deadline::{DeadlineContext, DeadlineError, DeadlineGuard};
pub use fanout::{CallOutcome, FanOut, OrchestrationError};

/// Why a composed orchestration failed.
#[derive(Debug, Error)]
pub enum OrchestrationFailure {
    #[error(transparent)]
    Setup(#[from] OrchestrationError),

    #[error(transparent)]
    Calls(#[from] AggregateFailure),
}

/// Fan-out plus all-or-nothing aggregation.
#[derive(Clone)]
pub struct Orchestrator {
    fanout: FanOut,
    sink: Arc<dyn FailureSink>,
}

impl Orchestrator {
    /// Orchestrator logging failures through `tracing`.
    pub fn new(downstream: Arc<dyn Downstream>, deadline: Duration) -> Self {
        Self::with_sink(downstream, deadline, Arc::new(TracingSink))
    }

    pub fn with_sink(
        downstream: Arc<dyn Downstream>,
        deadline: Duration,
        sink: Arc<dyn FailureSink>,
    ) -> Self {
        Self {
            fanout: FanOut::new(downstream, deadline),
            sink,
        }
    }

    pub fn sink(&self) -> &dyn FailureSink {
        self.sink.as_ref()
    }

    /// Run `descriptors` as one fan-out and return their values in order.
    pub async fn compose(
        &self,
        operation: &str,
        descriptors: Vec<CallDescriptor>,
    ) -> Result<Vec<CallValue>, OrchestrationFailure> {
        let started = Instant::now();
        let result = self.compose_inner(operation, descriptors).await;
        metrics::record_orchestration(operation, result.is_ok(), started);
        result
    }

    async fn compose_inner(
        &self,
        operation: &str,
        descriptors: Vec<CallDescriptor>,
    ) -> Result<Vec<CallValue>, OrchestrationFailure> {
        let outcomes = match self.fanout.run_all(descriptors).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                let message = e.to_string();
                self.sink.record(&FailureRecord {
                    kind: ErrorKind::OrchestrationFault,
                    operation,
                    resource: None,
                    message: &message,
                });
                return Err(e.into());
            }
        };

        let values = reduce(operation, &outcomes, self.sink.as_ref())?;
        tracing::debug!(operation, calls = values.len(), "Orchestration succeeded");
        Ok(values)
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("fanout", &self.fanout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::aggregate::tests::RecordingSink;
    use crate::orchestration::fanout::tests::{Script, ScriptedDownstream};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn orchestrator(scripts: &[(&str, Script)], deadline: Duration) -> (Orchestrator, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let orchestrator =
            Orchestrator::with_sink(ScriptedDownstream::new(scripts), deadline, sink.clone());
        (orchestrator, sink)
    }

    fn api1() -> Vec<CallDescriptor> {
        vec![CallDescriptor::get("api/2"), CallDescriptor::get("api/3")]
    }

    #[tokio::test]
    async fn test_composes_in_declared_order() {
        let (orchestrator, sink) = orchestrator(
            &[
                ("api/2", Script::Succeed { after: ms(120), value: 5 }),
                ("api/3", Script::Succeed { after: ms(5), value: 7 }),
            ],
            ms(900),
        );
        let values = orchestrator.compose("Get1Async", api1()).await.unwrap();
        assert_eq!(values, vec![5, 7]);
        assert!(sink.take().is_empty());
    }

    #[tokio::test]
    async fn test_one_failure_fails_everything() {
        let (orchestrator, sink) = orchestrator(
            &[
                ("api/2", Script::Succeed { after: ms(5), value: 5 }),
                ("api/3", Script::Fail { after: ms(5) }),
            ],
            ms(900),
        );
        let err = orchestrator.compose("Get1Async", api1()).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestrationFailure::Calls(AggregateFailure { failed: 1, total: 2 })
        ));

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].resource.as_deref(), Some("api/3"));
    }

    #[tokio::test]
    async fn test_deadline_expiry_fails_orchestration() {
        let (orchestrator, sink) = orchestrator(
            &[
                ("api/2", Script::Succeed { after: ms(5), value: 5 }),
                ("api/3", Script::Succeed { after: ms(2000), value: 7 }),
            ],
            ms(100),
        );
        assert!(orchestrator.compose("Get1Async", api1()).await.is_err());

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ErrorKind::Cancelled);
        assert_eq!(records[0].resource.as_deref(), Some("api/3"));
    }

    #[tokio::test]
    async fn test_setup_failure_is_logged_once() {
        let (orchestrator, sink) = orchestrator(&[], ms(900));
        let err = orchestrator.compose("Get1Async", Vec::new()).await.unwrap_err();
        assert!(matches!(err, OrchestrationFailure::Setup(OrchestrationError::EmptyBatch)));

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ErrorKind::OrchestrationFault);
        assert_eq!(records[0].resource, None);
    }
}
