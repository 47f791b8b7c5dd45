//! Failure taxonomy for downstream calls.

use thiserror::Error;

/// Coarse classification used for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Could not reach the downstream.
    TransportFailure,
    /// Downstream answered with an error status or an unreadable body.
    RemoteFailure,
    /// The shared deadline (or an explicit cancel) fired first.
    Cancelled,
    /// Failure outside the call itself (setup, task panic).
    OrchestrationFault,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::TransportFailure => "transport_failure",
            ErrorKind::RemoteFailure => "remote_failure",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::OrchestrationFault => "orchestration_fault",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single downstream call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("transport error calling {resource}: {message}")]
    Transport { resource: String, message: String },

    #[error("{resource} responded with status {status}: {message}")]
    Remote {
        resource: String,
        status: u16,
        message: String,
    },

    #[error("{resource} returned an unreadable body: {message}")]
    Decode { resource: String, message: String },

    #[error("call to {resource} cancelled before completion")]
    Cancelled { resource: String },

    #[error("call to {resource} aborted: {message}")]
    Fault { resource: String, message: String },
}

impl CallError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CallError::Transport { .. } => ErrorKind::TransportFailure,
            CallError::Remote { .. } | CallError::Decode { .. } => ErrorKind::RemoteFailure,
            CallError::Cancelled { .. } => ErrorKind::Cancelled,
            CallError::Fault { .. } => ErrorKind::OrchestrationFault,
        }
    }

    pub fn resource(&self) -> &str {
        match self {
            CallError::Transport { resource, .. }
            | CallError::Remote { resource, .. }
            | CallError::Decode { resource, .. }
            | CallError::Cancelled { resource }
            | CallError::Fault { resource, .. } => resource,
        }
    }

    /// Shorthand used by the client and the fan-out executor.
    pub fn cancelled(resource: impl Into<String>) -> Self {
        CallError::Cancelled {
            resource: resource.into(),
        }
    }
}
