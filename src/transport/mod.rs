//! Transport layer between the panel and the LED controller.
//!
//! The [`Transport`] trait abstracts over the real HTTP client and the
//! recording mock, so panel behaviour is testable without a controller on
//! the network.

mod http;
pub mod mock;

pub use http::{DEFAULT_BASE_URL, HttpController};

use serde_json::Value;

use crate::error::Result;
use crate::request::Command;

/// Sends a single command and yields the controller's JSON reply.
///
/// Implementations must be shareable across tasks: every command is sent
/// from its own spawned task holding an `Arc` of the transport.
pub trait Transport: Send + Sync + 'static {
    /// Send `command` and return the decoded response body.
    ///
    /// An empty body decodes to `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns `Transport` when the controller cannot be reached,
    /// `Status` for a non-success reply and `InvalidResponse` when the
    /// body is not JSON.
    fn send(&self, command: &Command) -> impl Future<Output = Result<Value>> + Send;
}
