//! The single error type returned by call execution.
//!
//! # Design
//! Every stage of a call (configuration, encoding, transport, status check,
//! decoding) fails with the same `CallError` shape: the URL that was
//! attempted, an HTTP status, and a cause. Failures that happen before a
//! response exists use a sentinel status: 500 for local problems and 502
//! when the transport could not produce a response. Non-2xx responses keep
//! the status the server sent. The response body of a failed call is never
//! captured.

use thiserror::Error;

use crate::codec::CodecError;

/// Status reported for failures on our side of the wire.
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Status reported when no response was obtained.
pub const STATUS_BAD_GATEWAY: u16 = 502;

/// What went wrong during a call.
#[derive(Debug, Error)]
pub enum CallErrorKind {
    /// The call was configured incorrectly; nothing was sent.
    #[error("invalid call: {0}")]
    InvalidCall(String),

    #[error("failed to encode request: {0}")]
    Encode(#[source] CodecError),

    #[error("failed to call url: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered outside 200..=299.
    #[error("error code response")]
    ErrorResponse,

    #[error("failed to decode response: {0}")]
    Decode(#[source] CodecError),
}

/// A failed call, with the URL it targeted and an HTTP status.
#[derive(Debug, Error)]
#[error("error calling url; url={url}; status={status}; msg={kind}")]
pub struct CallError {
    #[source]
    kind: CallErrorKind,
    url: String,
    status: u16,
}

impl CallError {
    pub fn new(kind: CallErrorKind, url: impl Into<String>, status: u16) -> Self {
        Self {
            kind,
            url: url.into(),
            status,
        }
    }

    pub fn invalid_call(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            CallErrorKind::InvalidCall(reason.into()),
            url,
            STATUS_INTERNAL_ERROR,
        )
    }

    pub fn encode(url: impl Into<String>, source: CodecError) -> Self {
        Self::new(CallErrorKind::Encode(source), url, STATUS_INTERNAL_ERROR)
    }

    pub fn transport<E>(url: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::new(
            CallErrorKind::Transport(Box::new(source)),
            url,
            STATUS_BAD_GATEWAY,
        )
    }

    pub fn error_response(url: impl Into<String>, status: u16) -> Self {
        Self::new(CallErrorKind::ErrorResponse, url, status)
    }

    pub fn decode(url: impl Into<String>, source: CodecError) -> Self {
        Self::new(CallErrorKind::Decode(source), url, STATUS_INTERNAL_ERROR)
    }

    pub fn kind(&self) -> &CallErrorKind {
        &self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }
}
