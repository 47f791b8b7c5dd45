//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, tracing span)
//!     → handlers.rs (/api/1 fan-out, /api/2 and /api/3 bounded work)
//!     → response.rs (200 + JSON, or empty 500)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use handlers::{Api1PostRequest, Api1Response};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
