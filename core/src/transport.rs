//! The network seam: something that turns an `HttpRequest` into a response.
//!
//! # Design
//! The core never opens sockets. Callers pass a `Transport` that already
//! carries its own pooling, timeouts, TLS and redirect policy. With the
//! default `ureq` feature, a configured `ureq::Agent` is a transport.

use std::io::Read;

use crate::http::{HttpRequest, HttpResponse};

/// Sends one request and returns the response with its body unread.
pub trait Transport {
    /// Readable response body. Dropping it releases the connection.
    type Body: Read;

    /// Failure to obtain any response at all.
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(&self, request: HttpRequest) -> Result<HttpResponse<Self::Body>, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    type Body = T::Body;
    type Error = T::Error;

    fn send(&self, request: HttpRequest) -> Result<HttpResponse<Self::Body>, Self::Error> {
        (**self).send(request)
    }
}

// An agent left with `http_status_as_error(true)` reports non-2xx statuses as
// `ureq::Error::StatusCode`; those come back as empty-bodied responses so the
// caller still sees the real status.
#[cfg(feature = "ureq")]
mod ureq_agent {
    use std::io::Read;

    use http::{HeaderMap, Method, Uri};

    use super::Transport;
    use crate::http::{HttpRequest, HttpResponse};

    impl Transport for ureq::Agent {
        type Body = Box<dyn Read>;
        type Error = ureq::Error;

        fn send(&self, request: HttpRequest) -> Result<HttpResponse<Self::Body>, Self::Error> {
            let uri: Uri = request
                .url
                .parse()
                .map_err(|e: http::uri::InvalidUri| ureq::Error::BadUri(e.to_string()))?;

            let result = if request.body.is_empty() {
                self.run(build(request.method, uri, request.headers, ()))
            } else {
                self.run(build(request.method, uri, request.headers, request.body))
            };

            match result {
                Ok(response) => {
                    let (parts, body) = response.into_parts();
                    Ok(HttpResponse {
                        status: parts.status.as_u16(),
                        headers: parts.headers,
                        body: Box::new(body.into_reader()),
                    })
                }
                Err(ureq::Error::StatusCode(status)) => Ok(HttpResponse {
                    status,
                    headers: HeaderMap::new(),
                    body: Box::new(std::io::empty()),
                }),
                Err(e) => Err(e),
            }
        }
    }

    fn build<B>(method: Method, uri: Uri, headers: HeaderMap, body: B) -> http::Request<B> {
        let mut request = http::Request::new(body);
        *request.method_mut() = method;
        *request.uri_mut() = uri;
        *request.headers_mut() = headers;
        request
    }
}
