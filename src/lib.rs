//! SepsisCare API Gateway Library
//!
//! A prefix-routed reverse proxy with aggregate dependency health checks,
//! built with Tokio and Axum.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
