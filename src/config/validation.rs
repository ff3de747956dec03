//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate route targets parse as HTTP origins
//! - Detect conflicting routes and duplicate probe names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("route '{0}' has an empty prefix")]
    EmptyPrefix(String),

    #[error("route '{0}' prefix must start with '/'")]
    RelativePrefix(String),

    #[error("duplicate route prefix '{0}'")]
    DuplicatePrefix(String),

    #[error("route '{route}' target is invalid: {reason}")]
    InvalidTarget { route: String, reason: String },

    #[error("route '{0}' target must be an origin without a path")]
    TargetHasPath(String),

    #[error("duplicate probe name '{0}'")]
    DuplicateProbe(String),

    #[error("probe '{0}' url is invalid")]
    InvalidProbeUrl(String),

    #[error("probe timeout must be greater than zero ('{0}')")]
    ZeroProbeTimeout(String),
}

/// Check referential and value-level integrity of a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut prefixes = HashSet::new();
    for route in &config.routes {
        if route.prefix.is_empty() {
            errors.push(ValidationError::EmptyPrefix(route.name.clone()));
        } else if !route.prefix.starts_with('/') {
            errors.push(ValidationError::RelativePrefix(route.name.clone()));
        }
        if !prefixes.insert(route.prefix.trim_end_matches('/').to_string()) {
            errors.push(ValidationError::DuplicatePrefix(route.prefix.clone()));
        }
        match Url::parse(&route.target) {
            Ok(url) => {
                if url.path() != "/" || url.query().is_some() {
                    errors.push(ValidationError::TargetHasPath(route.name.clone()));
                }
            }
            Err(e) => errors.push(ValidationError::InvalidTarget {
                route: route.name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if config.health.timeout_ms == 0 {
        errors.push(ValidationError::ZeroProbeTimeout("default".to_string()));
    }
    let mut probe_names = HashSet::new();
    for probe in &config.health.probes {
        if !probe_names.insert(probe.name.clone()) {
            errors.push(ValidationError::DuplicateProbe(probe.name.clone()));
        }
        if Url::parse(&probe.url).is_err() {
            errors.push(ValidationError::InvalidProbeUrl(probe.name.clone()));
        }
        if probe.timeout_ms == Some(0) {
            errors.push(ValidationError::ZeroProbeTimeout(probe.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ProbeConfig, ProbeMethod, RouteConfig};

    fn route(name: &str, prefix: &str, target: &str) -> RouteConfig {
        RouteConfig {
            name: name.into(),
            prefix: prefix.into(),
            target: target.into(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let mut config = GatewayConfig::default();
        config.routes.push(route("auth", "/auth", "http://localhost:5001"));
        config.routes.push(route("patients", "/patients", "http://localhost:5002"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = GatewayConfig::default();
        config.routes.push(route("a", "", "not a url"));
        config.routes.push(route("b", "patients", "http://localhost:5002/api"));
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyPrefix("a".into())));
        assert!(errors.contains(&ValidationError::RelativePrefix("b".into())));
        assert!(errors.contains(&ValidationError::TargetHasPath("b".into())));
        assert!(errors.len() >= 4);
    }

    #[test]
    fn test_duplicate_prefix_rejected() {
        let mut config = GatewayConfig::default();
        config.routes.push(route("a", "/auth", "http://localhost:5001"));
        config.routes.push(route("b", "/auth/", "http://localhost:5009"));
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::DuplicatePrefix("/auth/".into())]);
    }

    #[test]
    fn test_duplicate_probe_rejected() {
        let mut config = GatewayConfig::default();
        for _ in 0..2 {
            config.health.probes.push(ProbeConfig {
                name: "db".into(),
                url: "http://localhost:5432".into(),
                method: ProbeMethod::Connect,
                timeout_ms: None,
            });
        }
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::DuplicateProbe("db".into())]);
    }
}
