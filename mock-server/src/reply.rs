//! Response helpers shared by the handlers.

use std::fmt::Display;

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Reply 200 with `data` as indented JSON.
pub fn reply_json<T: Serialize + ?Sized>(data: &T) -> Response {
    match serde_json::to_string_pretty(data) {
        Ok(body) => reply_raw_json(body),
        Err(e) => {
            tracing::error!(error = %e, "failed marshal json");
            reply_error(e, StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Reply 200 with a body that is already JSON.
pub fn reply_raw_json(body: impl Into<String>) -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, JSON_UTF8)], body.into()).into_response()
}

/// Reply with `status` and the error message as plain text.
pub fn reply_error(err: impl Display, status: StatusCode) -> Response {
    tracing::info!(error = %err, status = status.as_u16(), "request failed");
    (status, err.to_string()).into_response()
}
