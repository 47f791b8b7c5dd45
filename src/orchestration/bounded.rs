//! Single-call orchestrator: one bounded unit of work.

use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;
use thiserror::Error;

use crate::downstream::{CallValue, ErrorKind};
use crate::orchestration::aggregate::{FailureRecord, FailureSink, TracingSink};

/// Generic failure returned when the work faulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{label} failed")]
pub struct BoundedFailure {
    pub label: String,
}

/// Faults raised by [`simulate_work`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkError {
    #[error("delay must be non-negative, got {0}ms")]
    NegativeDelay(i64),
}

/// Run `work` to completion, logging a fault tagged with `label`.
pub async fn run_bounded<T, E, F>(work: F, label: &str) -> Result<T, BoundedFailure>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    run_bounded_with(work, label, &TracingSink).await
}

/// [`run_bounded`] with an explicit failure sink.
///
/// A panic inside `work` is treated like an error.
pub async fn run_bounded_with<T, E, F>(
    work: F,
    label: &str,
    sink: &dyn FailureSink,
) -> Result<T, BoundedFailure>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    let message = match AssertUnwindSafe(work).catch_unwind().await {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(e)) => e.to_string(),
        Err(panic) => panic_message(panic.as_ref()),
    };

    sink.record(&FailureRecord {
        kind: ErrorKind::OrchestrationFault,
        operation: label,
        resource: None,
        message: &message,
    });
    Err(BoundedFailure {
        label: label.to_string(),
    })
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

/// Simulated processing latency: wait `delay_ms`, then return it.
///
/// Every negative delay is rejected with [`WorkError::NegativeDelay`],
/// `-1` included. It is not treated as "wait forever", so a caller can
/// never park a request indefinitely.
pub async fn simulate_work(delay_ms: i64) -> Result<CallValue, WorkError> {
    let millis = u64::try_from(delay_ms).map_err(|_| WorkError::NegativeDelay(delay_ms))?;
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Ok(delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::aggregate::tests::RecordingSink;

    #[tokio::test]
    async fn test_success_returns_value() {
        let sink = RecordingSink::default();
        let value = run_bounded_with(simulate_work(20), "Get2Async", &sink).await;
        assert_eq!(value, Ok(20));
        assert!(sink.take().is_empty());
    }

    #[tokio::test]
    async fn test_fault_is_logged_with_label() {
        let sink = RecordingSink::default();
        let result = run_bounded_with(simulate_work(-5), "Post3Async", &sink).await;
        assert_eq!(
            result,
            Err(BoundedFailure {
                label: "Post3Async".into()
            })
        );

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operation, "Post3Async");
        assert_eq!(records[0].kind, ErrorKind::OrchestrationFault);
        assert!(records[0].message.contains("-5"));
    }

    #[tokio::test]
    async fn test_minus_one_does_not_wait_forever() {
        let result = tokio::time::timeout(Duration::from_secs(1), simulate_work(-1)).await;
        assert_eq!(result, Ok(Err(WorkError::NegativeDelay(-1))));
    }

    #[tokio::test]
    async fn test_panic_is_a_fault() {
        let sink = RecordingSink::default();
        let work = async {
            if true {
                panic!("worker exploded");
            }
            Ok::<CallValue, WorkError>(1)
        };
        let result = run_bounded_with(work, "Get3Async", &sink).await;
        assert!(result.is_err());
        assert_eq!(sink.take()[0].message, "worker exploded");
    }

    #[tokio::test]
    async fn test_default_sink() {
        assert_eq!(run_bounded(simulate_work(0), "Get2Async").await, Ok(0));
    }
}
