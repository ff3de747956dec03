//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the API gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Route definitions mapping path prefixes to backend services.
    pub routes: Vec<RouteConfig>,

    /// Health aggregation settings.
    pub health: HealthConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Route configuration mapping a path prefix to a backend service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Service name for logging/metrics and error bodies.
    pub name: String,

    /// Path prefix to match (e.g., "/patients").
    pub prefix: String,

    /// Backend origin to forward to (e.g., "http://localhost:5002").
    pub target: String,
}

/// Health aggregation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Dependencies probed by the aggregate status endpoint.
    pub probes: Vec<ProbeConfig>,

    /// Default per-probe timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            probes: Vec::new(),
            timeout_ms: 3000,
        }
    }
}

/// A single health probe target.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Capability name; surfaced as "<name>Status" in the aggregate body.
    pub name: String,

    /// URL to probe.
    pub url: String,

    /// How to probe the target.
    #[serde(default)]
    pub method: ProbeMethod,

    /// Per-probe timeout override in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Probe style for a health check target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    /// HTTP HEAD request.
    #[default]
    Head,
    /// HTTP GET request.
    Get,
    /// TCP connect only; for dependencies without an HTTP surface
    /// (e.g., the database).
    Connect,
}

/// Timeout configuration for outbound operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for a proxied upstream call in seconds.
    pub upstream_secs: u64,

    /// Request timeout (inbound, total) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_secs: 10,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
