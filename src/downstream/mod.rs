//! Downstream call subsystem.
//!
//! # Data Flow
//! ```text
//! CallDescriptor (resource, verb, payload)
//!     → Downstream::call(descriptor, deadline)
//!     → client.rs (reqwest request against base/resource)
//!     → Ok(value) | Err(CallError: transport / remote / cancelled)
//! ```
//!
//! # Design Decisions
//! - The orchestration layer only sees the `Downstream` trait
//! - Every error carries the resource it came from
//! - Values are integers; a non-integer 2xx body is a remote failure

pub mod client;
pub mod descriptor;
pub mod error;

use async_trait::async_trait;

use crate::orchestration::deadline::DeadlineContext;

pub use client::HttpDownstream;
pub use descriptor::{CallDescriptor, CallMethod};
pub use error::{CallError, ErrorKind};

/// Value produced by a successful downstream call.
pub type CallValue = i64;

/// Capability to perform one downstream call under a deadline.
#[async_trait]
pub trait Downstream: Send + Sync {
    /// Issue the call described by `descriptor`.
    ///
    /// Implementations must return `CallError::Cancelled` once `deadline`
    /// fires instead of waiting for a response.
    async fn call(
        &self,
        descriptor: &CallDescriptor,
        deadline: &DeadlineContext,
    ) -> Result<CallValue, CallError>;
}
