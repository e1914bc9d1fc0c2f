//! Synchronous outbound HTTP call builder.
//!
//! # Overview
//! A [`Call`] describes one HTTP invocation: method, URL, content kind,
//! basic-auth credentials and extra headers. Executing it against a
//! caller-supplied [`Transport`] encodes the input, sends the request,
//! classifies the response and decodes the output. Every failure comes back
//! as a single [`CallError`] carrying the URL and an HTTP status.
//!
//! # Design
//! - Builder methods never fail. Invalid configuration is recorded and
//!   reported when the call executes, before the transport is touched.
//! - The transport owns timeouts, redirects, TLS and pooling. The core only
//!   performs one round trip and always releases the response body.
//! - Nothing is logged unless a [`CallObserver`] is attached.

pub mod call;
pub mod codec;
pub mod consul;
pub mod error;
pub mod http;
pub mod observer;
pub mod transport;

pub use call::Call;
pub use codec::{CodecError, ContentKind};
pub use error::{CallError, CallErrorKind};
pub use self::http::{HttpRequest, HttpResponse};
pub use observer::{CallObserver, TracingObserver};
pub use transport::Transport;
