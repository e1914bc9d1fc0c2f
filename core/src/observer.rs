//! Optional instrumentation hooks for call execution.
//!
//! The executor itself never logs. Attach a [`CallObserver`] to a call to
//! see what it does; [`TracingObserver`] forwards everything to `tracing`.

use crate::error::CallError;
use crate::http::HttpRequest;

/// Receives notifications while a call executes. All hooks default to no-ops.
pub trait CallObserver: Send + Sync {
    /// An explicitly attached header is being applied to the request.
    fn on_header(&self, _name: &str) {}

    /// The request is about to be handed to the transport.
    fn on_dispatch(&self, _request: &HttpRequest) {}

    /// A response arrived with this status.
    fn on_response(&self, _url: &str, _status: u16) {}

    /// The call failed.
    fn on_error(&self, _error: &CallError) {}
}

/// Emits `tracing` events for each stage of a call.
///
/// Header values are never logged; they often carry credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn on_header(&self, name: &str) {
        tracing::debug!(header = name, "add header");
    }

    fn on_dispatch(&self, request: &HttpRequest) {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            body_len = request.body.len(),
            "sending request"
        );
    }

    fn on_response(&self, url: &str, status: u16) {
        tracing::debug!(url, status, "received response");
    }

    fn on_error(&self, error: &CallError) {
        tracing::warn!(url = error.url(), status = error.status(), error = %error, "call failed");
    }
}
