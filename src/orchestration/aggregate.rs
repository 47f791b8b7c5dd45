//! All-or-nothing reduction of call outcomes.
//!
//! # Responsibilities
//! - Record one diagnostic per failed outcome
//! - Succeed only when every outcome succeeded
//! - Assemble the payload in descriptor order
//!
//! # Design Decisions
//! - Diagnostics go to an injected [`FailureSink`], never to the caller
//! - Every failure is recorded, not just the first

use thiserror::Error;

use crate::downstream::{CallValue, ErrorKind};
use crate::orchestration::fanout::CallOutcome;

/// One operator-facing failure record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord<'a> {
    pub kind: ErrorKind,
    /// Logical operation (e.g. `Get1Async`).
    pub operation: &'a str,
    /// Failing resource, when the failure belongs to one call.
    pub resource: Option<&'a str>,
    pub message: &'a str,
}

/// Destination for failure diagnostics.
pub trait FailureSink: Send + Sync {
    fn record(&self, failure: &FailureRecord<'_>);
}

/// Writes failures to the `tracing` error log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn record(&self, failure: &FailureRecord<'_>) {
        match failure.resource {
            Some(resource) => tracing::error!(
                kind = %failure.kind,
                api = failure.operation,
                service = resource,
                "Failed {}: calling {} - {}",
                failure.operation,
                resource,
                failure.message
            ),
            None => tracing::error!(
                kind = %failure.kind,
                api = failure.operation,
                error = failure.message,
                "Failed {} request.",
                failure.operation
            ),
        }
    }
}

/// Generic failure marker returned when any call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{failed} of {total} calls failed")]
pub struct AggregateFailure {
    pub failed: usize,
    pub total: usize,
}

/// Reduce outcomes to the ordered payload, or fail if any call failed.
pub fn reduce(
    operation: &str,
    outcomes: &[CallOutcome],
    sink: &dyn FailureSink,
) -> Result<Vec<CallValue>, AggregateFailure> {
    let mut values = Vec::with_capacity(outcomes.len());
    let mut failed = 0;

    for outcome in outcomes {
        match &outcome.result {
            Ok(value) => values.push(*value),
            Err(e) => {
                failed += 1;
                let message = e.to_string();
                sink.record(&FailureRecord {
                    kind: e.kind(),
                    operation,
                    resource: Some(outcome.resource.as_str()),
                    message: &message,
                });
            }
        }
    }

    if failed > 0 {
        return Err(AggregateFailure {
            failed,
            total: outcomes.len(),
        });
    }
    Ok(values)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::downstream::CallError;
    use std::sync::Mutex;

    /// Owned copy of a [`FailureRecord`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct Recorded {
        pub kind: ErrorKind,
        pub operation: String,
        pub resource: Option<String>,
        pub message: String,
    }

    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub records: Mutex<Vec<Recorded>>,
    }

    impl RecordingSink {
        pub(crate) fn take(&self) -> Vec<Recorded> {
            std::mem::take(&mut *self.records.lock().unwrap())
        }
    }

    impl FailureSink for RecordingSink {
        fn record(&self, failure: &FailureRecord<'_>) {
            self.records.lock().unwrap().push(Recorded {
                kind: failure.kind,
                operation: failure.operation.to_string(),
                resource: failure.resource.map(str::to_string),
                message: failure.message.to_string(),
            });
        }
    }

    fn ok(resource: &str, value: CallValue) -> CallOutcome {
        CallOutcome {
            resource: resource.into(),
            result: Ok(value),
        }
    }

    fn cancelled(resource: &str) -> CallOutcome {
        CallOutcome {
            resource: resource.into(),
            result: Err(CallError::cancelled(resource)),
        }
    }

    #[test]
    fn test_all_success_keeps_order() {
        let sink = RecordingSink::default();
        let values = reduce("Get1Async", &[ok("api/2", 5), ok("api/3", 7)], &sink).unwrap();
        assert_eq!(values, vec![5, 7]);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_single_failure_fails_batch_with_one_record() {
        let sink = RecordingSink::default();
        let err = reduce("Get1Async", &[ok("api/2", 5), cancelled("api/3")], &sink).unwrap_err();
        assert_eq!(err, AggregateFailure { failed: 1, total: 2 });

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ErrorKind::Cancelled);
        assert_eq!(records[0].operation, "Get1Async");
        assert_eq!(records[0].resource.as_deref(), Some("api/3"));
        assert!(records[0].message.contains("api/3"));
    }

    #[test]
    fn test_every_failure_is_recorded() {
        let sink = RecordingSink::default();
        let outcomes = [
            cancelled("api/2"),
            CallOutcome {
                resource: "api/3".into(),
                result: Err(CallError::Transport {
                    resource: "api/3".into(),
                    message: "connection refused".into(),
                }),
            },
        ];
        let err = reduce("Post1Async", &outcomes, &sink).unwrap_err();
        assert_eq!(err.failed, 2);

        let kinds: Vec<_> = sink.take().into_iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ErrorKind::Cancelled, ErrorKind::TransportFailure]);
    }
}
