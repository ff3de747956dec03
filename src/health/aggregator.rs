//! Aggregate health checking.
//!
//! # Responsibilities
//! - Probe every configured dependency concurrently (fan-out, join-all)
//! - Bound each probe with its own timeout
//! - Classify failures without ever failing the aggregate call

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use futures_util::future::join_all;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpStream;
use tokio::time;
use url::Url;

use crate::config::{HealthConfig, ProbeConfig, ProbeMethod};
use crate::health::probe::{ProbeError, ProbeOutcome};
use crate::observability::metrics;

/// Probes a fixed set of dependencies and collects a full status snapshot.
pub struct HealthAggregator {
    probes: Vec<ProbeConfig>,
    default_timeout: Duration,
    client: Client<HttpConnector, Body>,
}

impl HealthAggregator {
    pub fn new(config: HealthConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Self {
            probes: config.probes,
            default_timeout: Duration::from_millis(config.timeout_ms),
            client,
        }
    }

    /// Configured probes, in declaration order.
    pub fn probes(&self) -> &[ProbeConfig] {
        &self.probes
    }

    /// Probe all dependencies concurrently and wait for every probe to
    /// settle (success, failure, or timeout).
    ///
    /// Outcomes are returned in probe declaration order regardless of
    /// completion order, so response keys are stable across invocations.
    pub async fn snapshot(&self) -> Vec<ProbeOutcome> {
        let outcomes = join_all(self.probes.iter().map(|probe| self.run(probe))).await;

        for outcome in &outcomes {
            if !outcome.reachable {
                tracing::warn!(
                    service = %outcome.service,
                    error = ?outcome.error,
                    "Dependency probe failed"
                );
            }
            metrics::record_probe(&outcome.service, outcome.reachable);
        }

        outcomes
    }

    async fn run(&self, probe: &ProbeConfig) -> ProbeOutcome {
        let timeout = probe
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(self.default_timeout);

        match probe.method {
            ProbeMethod::Connect => self.probe_connect(probe, timeout).await,
            ProbeMethod::Head => self.probe_http(probe, Method::HEAD, timeout).await,
            ProbeMethod::Get => self.probe_http(probe, Method::GET, timeout).await,
        }
    }

    async fn probe_http(&self, probe: &ProbeConfig, method: Method, timeout: Duration) -> ProbeOutcome {
        let request = match Request::builder()
            .method(method)
            .uri(&probe.url)
            .header("user-agent", "sepsiscare-gateway-health")
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(e) => return ProbeOutcome::failed(&probe.name, ProbeError::Other(e.to_string())),
        };

        match time::timeout(timeout, self.client.request(request)).await {
            Ok(Ok(response)) => ProbeOutcome::from_status(&probe.name, response.status()),
            Ok(Err(e)) if e.is_connect() => {
                ProbeOutcome::failed(&probe.name, ProbeError::ConnectionRefused)
            }
            Ok(Err(e)) => ProbeOutcome::failed(&probe.name, ProbeError::Other(e.to_string())),
            Err(_) => ProbeOutcome::failed(&probe.name, ProbeError::Timeout),
        }
    }

    /// Protocol-level connectivity check: open a TCP connection and drop it.
    /// Used for dependencies without an HTTP health surface (the database).
    async fn probe_connect(&self, probe: &ProbeConfig, timeout: Duration) -> ProbeOutcome {
        let url = match Url::parse(&probe.url) {
            Ok(url) => url,
            Err(e) => return ProbeOutcome::failed(&probe.name, ProbeError::Other(e.to_string())),
        };
        let host = match url.host_str() {
            Some(host) => host.to_string(),
            None => {
                return ProbeOutcome::failed(
                    &probe.name,
                    ProbeError::Other("probe url has no host".to_string()),
                )
            }
        };
        let Some(port) = url.port_or_known_default() else {
            return ProbeOutcome::failed(
                &probe.name,
                ProbeError::Other("probe url has no port".to_string()),
            );
        };

        match time::timeout(timeout, TcpStream::connect((host.as_str(), port))).await {
            Ok(Ok(_stream)) => ProbeOutcome::connected(&probe.name),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::ConnectionRefused => {
                ProbeOutcome::failed(&probe.name, ProbeError::ConnectionRefused)
            }
            Ok(Err(e)) => ProbeOutcome::failed(&probe.name, ProbeError::Other(e.to_string())),
            Err(_) => ProbeOutcome::failed(&probe.name, ProbeError::Timeout),
        }
    }
}
