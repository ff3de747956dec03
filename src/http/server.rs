//! HTTP server setup and request forwarding.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (CORS, tracing, timeouts, request ID)
//! - Match inbound paths against the route table
//! - Forward matched requests to upstream services
//! - Serve the aggregate health endpoint
//!
//! Per-request processing is an explicit ordered pipeline: CORS → route
//! match → forward. Any stage can short-circuit with a response.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::time;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::config::GatewayConfig;
use crate::health::HealthAggregator;
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub client: Client<HttpConnector, Body>,
    pub health: Arc<HealthAggregator>,
    pub upstream_timeout: Duration,
}

/// HTTP server for the API gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let table = Arc::new(RouteTable::from_config(&config.routes));
        let health = Arc::new(HealthAggregator::new(config.health.clone()));
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            table,
            client,
            health,
            upstream_timeout: Duration::from_secs(config.timeouts.upstream_secs),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/checkStatus", get(check_status))
            .route("/", get(root))
            .fallback(forward_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            probes = self.config.health.probes.len(),
            "API gateway listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Root route, kept for load balancer smoke checks.
async fn root() -> Json<Value> {
    Json(json!({ "message": "API Gateway Running" }))
}

/// Aggregate health endpoint.
///
/// Always responds 200; dependency failures are reported in the body.
/// One `<name>Status` boolean per configured probe plus a `details` object,
/// with keys present regardless of probe outcome.
async fn check_status(State(state): State<AppState>) -> Json<Value> {
    let outcomes = state.health.snapshot().await;

    let mut body = serde_json::Map::new();
    let mut details = serde_json::Map::new();
    for outcome in &outcomes {
        body.insert(
            format!("{}Status", outcome.service),
            Value::Bool(outcome.reachable),
        );
        details.insert(
            outcome.service.clone(),
            serde_json::to_value(outcome).unwrap_or(Value::Null),
        );
    }
    body.insert("details".to_string(), Value::Object(details));

    Json(Value::Object(body))
}

/// Forwarding handler for everything the gateway does not serve itself.
///
/// Finds the longest matching prefix, rewrites the path and Host header,
/// and relays the upstream response byte-for-byte.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let path = request.uri().path().to_string();
    let method = request.method().to_string();

    let Some(matched) = state.table.matched(&path) else {
        tracing::warn!(method = %method, path = %path, "No route matched");
        metrics::record_request(&method, 404, "none", start);
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No matching route" })),
        )
            .into_response();
    };

    let service = matched.route.name.clone();
    let authority = target_authority(&matched.route.target);

    let uri = match upstream_uri(
        matched.route.target.scheme(),
        &authority,
        &matched.rewritten_path,
        request.uri().query(),
    ) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(service = %service, error = %e, "Failed to build upstream URI");
            metrics::record_request(&method, 502, &service, start);
            return upstream_unavailable(&service);
        }
    };

    tracing::debug!(
        method = %method,
        path = %path,
        service = %service,
        upstream = %uri,
        "Forwarding request"
    );

    // Copy method, version, headers, and body verbatim; only the Host
    // header is rewritten to the target origin.
    let (parts, body) = request.into_parts();
    let mut outbound = Request::builder()
        .method(parts.method)
        .uri(uri)
        .version(parts.version);
    if let Some(headers) = outbound.headers_mut() {
        for (name, value) in parts.headers.iter() {
            if name != header::HOST {
                headers.append(name.clone(), value.clone());
            }
        }
        if let Ok(host) = header::HeaderValue::from_str(&authority) {
            headers.insert(header::HOST, host);
        }
    }
    let outbound = match outbound.body(body) {
        Ok(outbound) => outbound,
        Err(e) => {
            tracing::error!(service = %service, error = %e, "Failed to build upstream request");
            metrics::record_request(&method, 502, &service, start);
            return upstream_unavailable(&service);
        }
    };

    match time::timeout(state.upstream_timeout, state.client.request(outbound)).await {
        Ok(Ok(response)) => {
            let status = response.status();
            metrics::record_request(&method, status.as_u16(), &service, start);

            // Relay status, headers, and body unmodified.
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Ok(Err(e)) => {
            tracing::error!(service = %service, error = %e, "Upstream unreachable");
            metrics::record_request(&method, 502, &service, start);
            upstream_unavailable(&service)
        }
        Err(_) => {
            tracing::error!(
                service = %service,
                timeout = ?state.upstream_timeout,
                "Upstream timed out"
            );
            metrics::record_request(&method, 504, &service, start);
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(json!({ "error": "Upstream timeout", "service": service })),
            )
                .into_response()
        }
    }
}

fn upstream_unavailable(service: &str) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": "Upstream unavailable", "service": service })),
    )
        .into_response()
}

/// `host[:port]` form of a route target, used for both the upstream URI
/// and the rewritten Host header.
fn target_authority(target: &Url) -> String {
    let host = target.host_str().unwrap_or_default();
    match target.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Compose the upstream URI from the route target and the rewritten path,
/// preserving the original query string.
fn upstream_uri(
    scheme: &str,
    authority: &str,
    path: &str,
    query: Option<&str>,
) -> Result<Uri, axum::http::Error> {
    let path_and_query = match query {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    Uri::builder()
        .scheme(scheme)
        .authority(authority)
        .path_and_query(path_and_query)
        .build()
}
