use std::{collections::HashMap, future::Future, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

pub mod reply;
pub mod shutdown;

use reply::{reply_error, reply_json};

/// One service instance as reported by `GET /v1/agent/services`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentService {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Port")]
    pub port: u16,
}

/// Body of `PUT /v1/agent/service/register`. `ID` defaults to `Name`.
#[derive(Deserialize)]
pub struct RegisterService {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Address", default)]
    pub address: String,
    #[serde(rename = "Port", default)]
    pub port: u16,
}

pub type Registry = Arc<RwLock<HashMap<String, AgentService>>>;

pub fn app() -> Router {
    let registry: Registry = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/echo", any(echo))
        .route("/echo/{status}", any(echo_with_status))
        .route("/status/{status}", any(status))
        .route("/headers", get(headers))
        .route("/malformed", get(malformed))
        .route("/v1/agent/services", get(list_services))
        .route("/v1/agent/service/register", put(register_service))
        .route("/v1/agent/service/deregister/{id}", put(deregister_service))
        .with_state(registry)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serve until `shutdown` resolves, then let in-flight requests finish.
pub async fn run_until<F>(listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app())
        .with_graceful_shutdown(shutdown)
        .await
}

async fn healthcheck() -> Response {
    reply_json(&serde_json::json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}

async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    echo_response(StatusCode::OK, &headers, body)
}

async fn echo_with_status(Path(code): Path<u16>, headers: HeaderMap, body: Bytes) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => echo_response(status, &headers, body),
        Err(e) => reply_error(e, StatusCode::BAD_REQUEST),
    }
}

/// Send the request body back, labelled with the request's content type.
fn echo_response(status: StatusCode, headers: &HeaderMap, body: Bytes) -> Response {
    let mut response = (status, body).into_response();
    if let Some(content_type) = headers.get(CONTENT_TYPE) {
        response
            .headers_mut()
            .insert(CONTENT_TYPE, content_type.clone());
    }
    response
}

async fn status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")).into_response(),
        Err(e) => reply_error(e, StatusCode::BAD_REQUEST),
    }
}

/// Report the request headers as a JSON object. Repeated names keep the
/// last value.
async fn headers(headers: HeaderMap) -> Response {
    let seen: HashMap<String, String> = headers
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            (name.as_str().to_string(), value)
        })
        .collect();
    reply_json(&seen)
}

async fn malformed() -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/json")],
        "{\"id\": 1,",
    )
        .into_response()
}

async fn list_services(State(registry): State<Registry>) -> Json<HashMap<String, AgentService>> {
    Json(registry.read().await.clone())
}

async fn register_service(
    State(registry): State<Registry>,
    Json(input): Json<RegisterService>,
) -> StatusCode {
    let service = AgentService {
        id: input.id.unwrap_or_else(|| input.name.clone()),
        service: input.name,
        address: input.address,
        port: input.port,
    };
    tracing::info!(id = %service.id, service = %service.service, "registered service");
    registry.write().await.insert(service.id.clone(), service);
    StatusCode::OK
}

async fn deregister_service(
    State(registry): State<Registry>,
    Path(id): Path<String>,
) -> StatusCode {
    let mut services = registry.write().await;
    services
        .remove(&id)
        .map(|_| StatusCode::OK)
        .unwrap_or(StatusCode::NOT_FOUND)
}
