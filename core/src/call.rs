//! Call builder and executor.
//!
//! # Design
//! A `Call` is configured by chaining methods that take and return it by
//! value. None of them fail: a bad method, URL or header is remembered and
//! returned when the call executes, before anything is encoded or sent. The
//! first recorded problem wins.
//!
//! Execution consumes the call and runs encode, dispatch, classify, decode.
//! Headers are resolved into a single-valued map in a fixed order:
//! `Content-Type` (input present), `Accept` (output requested),
//! `Authorization` (credentials set), then the explicit headers in the order
//! they were added. A later value for the same name (case-insensitive)
//! replaces an earlier one, so explicit headers always win.
//!
//! The response body is owned here from the moment the transport returns
//! it. Non-2xx bodies and bodies nobody asked for are drained and dropped;
//! requested bodies are decoded and dropped. Either way the body is released
//! exactly once.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use base64::prelude::*;
use http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{CodecError, ContentKind};
use crate::error::CallError;
use crate::http::{drain, HttpRequest};
use crate::observer::CallObserver;
use crate::transport::Transport;

/// Description of one outbound HTTP call.
///
/// Build a fresh `Call` for every request; it is consumed by execution.
#[derive(Default)]
pub struct Call {
    method: Option<Method>,
    url: String,
    content: ContentKind,
    credentials: Option<(String, String)>,
    headers: Vec<(HeaderName, HeaderValue)>,
    observer: Option<Arc<dyn CallObserver>>,
    error: Option<CallError>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

impl Call {
    pub fn new(method: &str, url: impl Into<String>) -> Self {
        Self::default().method_and_url(method, url)
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new("PUT", url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new("PATCH", url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new("DELETE", url)
    }

    /// Set the verb and target URL.
    pub fn method_and_url(mut self, method: &str, url: impl Into<String>) -> Self {
        self.url = url.into();
        self.method = Method::from_bytes(method.as_bytes()).ok();
        if self.method.is_none() {
            self.fail(format!("invalid method {method:?}"));
        }
        if let Err(e) = url::Url::parse(&self.url) {
            let reason = format!("invalid url {:?}: {e}", self.url);
            self.fail(reason);
        }
        self
    }

    /// Append a header. A later header with the same name replaces this one
    /// when the request is sent.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(name) => name,
            Err(_) => {
                self.fail(format!("invalid header name {name:?}"));
                return self;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(value) => self.headers.push((name, value)),
            Err(_) => self.fail(format!("invalid value for header {name}")),
        }
        self
    }

    pub fn json(self) -> Self {
        self.content(ContentKind::Json)
    }

    pub fn xml(self) -> Self {
        self.content(ContentKind::Xml)
    }

    /// Select how input and output bodies are encoded. The last call wins.
    pub fn content(mut self, kind: ContentKind) -> Self {
        self.content = kind;
        self
    }

    /// Send basic-auth credentials. Two empty strings clear them.
    pub fn basic_auth(mut self, user: &str, password: &str) -> Self {
        self.credentials = if user.is_empty() && password.is_empty() {
            None
        } else {
            Some((user.to_string(), password.to_string()))
        };
        self
    }

    pub fn observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    fn fail(&mut self, reason: String) {
        if self.error.is_none() {
            self.error = Some(CallError::invalid_call(self.url.clone(), reason));
        }
    }
}

impl fmt::Debug for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("content", &self.content)
            .field("basic_auth", &self.credentials.is_some())
            .field(
                "headers",
                &self.headers.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("observer", &self.observer.is_some())
            .field("error", &self.error)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

impl Call {
    /// Run the call.
    ///
    /// `input`, when present, is encoded with the call's content kind and
    /// sent as the body. `output`, when present, receives the decoded 2xx
    /// response body; otherwise the body is discarded. With no content kind
    /// the body is discarded too and `output` is left as it was.
    pub fn execute<T, I, O>(
        self,
        transport: &T,
        input: Option<&I>,
        output: Option<&mut O>,
    ) -> Result<(), CallError>
    where
        T: Transport + ?Sized,
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        match output {
            Some(out) if self.content != ContentKind::None => {
                self.run(transport, input, true, |kind, body| {
                    *out = kind.decode(body)?;
                    Ok(())
                })
            }
            _ => self.run(transport, input, false, discard),
        }
    }

    /// Run the call with no input and ignore the response body.
    pub fn send<T: Transport + ?Sized>(self, transport: &T) -> Result<(), CallError> {
        self.run(transport, None::<&()>, false, discard)
    }

    /// Run the call with `input` and ignore the response body.
    pub fn send_with<T, I>(self, transport: &T, input: &I) -> Result<(), CallError>
    where
        T: Transport + ?Sized,
        I: Serialize + ?Sized,
    {
        self.run(transport, Some(input), false, discard)
    }

    /// Run the call with no input and decode the response body.
    pub fn fetch<T, O>(self, transport: &T) -> Result<O, CallError>
    where
        T: Transport + ?Sized,
        O: DeserializeOwned,
    {
        self.run(transport, None::<&()>, true, |kind, body| kind.decode(body))
    }

    /// Run the call with `input` and decode the response body.
    pub fn fetch_with<T, I, O>(self, transport: &T, input: &I) -> Result<O, CallError>
    where
        T: Transport + ?Sized,
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.run(transport, Some(input), true, |kind, body| kind.decode(body))
    }

    fn run<T, I, R, F>(
        self,
        transport: &T,
        input: Option<&I>,
        accept: bool,
        read: F,
    ) -> Result<R, CallError>
    where
        T: Transport + ?Sized,
        I: Serialize + ?Sized,
        F: FnOnce(ContentKind, &mut dyn Read) -> Result<R, CodecError>,
    {
        let observer = self.observer.clone();
        let result = self.round_trip(transport, input, accept, read);
        if let (Err(err), Some(observer)) = (&result, &observer) {
            observer.on_error(err);
        }
        result
    }

    fn round_trip<T, I, R, F>(
        self,
        transport: &T,
        input: Option<&I>,
        accept: bool,
        read: F,
    ) -> Result<R, CallError>
    where
        T: Transport + ?Sized,
        I: Serialize + ?Sized,
        F: FnOnce(ContentKind, &mut dyn Read) -> Result<R, CodecError>,
    {
        let observer = self.observer.clone();
        let content = self.content;
        let request = self.into_request(input, accept)?;
        let url = request.url.clone();

        if let Some(observer) = &observer {
            observer.on_dispatch(&request);
        }
        let mut response = transport
            .send(request)
            .map_err(|e| CallError::transport(url.as_str(), e))?;
        if let Some(observer) = &observer {
            observer.on_response(&url, response.status);
        }

        if !response.is_success() {
            response.discard_body();
            return Err(CallError::error_response(url, response.status));
        }

        read(content, &mut response.body).map_err(|e| CallError::decode(url, e))
    }

    /// Validate the configuration, encode the input and resolve headers.
    fn into_request<I>(self, input: Option<&I>, accept: bool) -> Result<HttpRequest, CallError>
    where
        I: Serialize + ?Sized,
    {
        let Call {
            method,
            url,
            content,
            credentials,
            headers: extra_headers,
            observer,
            error,
        } = self;

        if let Some(err) = error {
            return Err(err);
        }
        let Some(method) = method else {
            return Err(CallError::invalid_call(url, "missing method"));
        };
        if url.is_empty() {
            return Err(CallError::invalid_call(url, "missing url"));
        }
        if content == ContentKind::None && input.is_some() {
            return Err(CallError::invalid_call(url, "request body requires a content kind"));
        }

        let body = match input {
            Some(value) => content
                .encode(value)
                .map_err(|e| CallError::encode(url.as_str(), e))?,
            None => Vec::new(),
        };

        let mut headers = HeaderMap::new();
        if let Some(media_type) = content.media_type() {
            if input.is_some() {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(media_type));
            }
            if accept {
                headers.insert(ACCEPT, HeaderValue::from_static(media_type));
            }
        }
        if let Some((user, password)) = credentials {
            let token = BASE64_STANDARD.encode(format!("{user}:{password}"));
            let value = HeaderValue::from_str(&format!("Basic {token}"))
                .map_err(|_| CallError::invalid_call(url.as_str(), "invalid basic auth header"))?;
            headers.insert(AUTHORIZATION, value);
        }
        for (name, value) in extra_headers {
            if let Some(observer) = &observer {
                observer.on_header(name.as_str());
            }
            headers.insert(name, value);
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

fn discard(_: ContentKind, body: &mut dyn Read) -> Result<(), CodecError> {
    drain(body);
    Ok(())
}
