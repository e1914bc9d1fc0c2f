//! HTTP request and response types exchanged with a [`Transport`].
//!
//! # Design
//! These types describe one round trip as plain data. The executor builds an
//! `HttpRequest` with the body already encoded and the header map already
//! resolved; the transport hands back an `HttpResponse` whose body is still
//! an unread stream. The executor owns that stream until it returns, so the
//! body is dropped (and the connection released) exactly once.
//!
//! [`Transport`]: crate::Transport

use std::io::Read;

use http::{HeaderMap, Method};

/// An outbound HTTP request ready to be sent.
///
/// Headers are single-valued: every name appears at most once, holding the
/// last value assigned to it while the call was being resolved.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// An HTTP response whose body has not been read yet.
#[derive(Debug)]
pub struct HttpResponse<B> {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: B,
}

impl<B: Read> HttpResponse<B> {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Read the rest of the body and throw it away.
    ///
    /// Read errors are ignored: the body is being discarded, and the caller
    /// drops it right after.
    pub fn discard_body(&mut self) {
        drain(&mut self.body);
    }
}

pub(crate) fn drain<R: Read + ?Sized>(body: &mut R) {
    let _ = std::io::copy(body, &mut std::io::sink());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static [u8]) -> HttpResponse<&'static [u8]> {
        HttpResponse {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    #[test]
    fn success_range_is_inclusive() {
        assert!(response(200, b"").is_success());
        assert!(response(201, b"").is_success());
        assert!(response(299, b"").is_success());
    }

    #[test]
    fn outside_success_range_is_failure() {
        assert!(!response(199, b"").is_success());
        assert!(!response(300, b"").is_success());
        assert!(!response(404, b"").is_success());
        assert!(!response(500, b"").is_success());
    }

    #[test]
    fn discard_body_consumes_everything() {
        let mut resp = response(500, b"internal error");
        resp.discard_body();
        assert!(resp.body.is_empty());
    }
}
