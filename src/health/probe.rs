//! Probe result types and outcome classification.

use axum::http::StatusCode;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Why a dependency was marked unreachable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// TCP connection was refused by the target.
    #[error("connection refused")]
    ConnectionRefused,

    /// The probe did not complete within its timeout.
    #[error("timed out")]
    Timeout,

    /// The target answered with a status outside [200, 300).
    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    /// Anything else (DNS failure, protocol error, malformed URL).
    #[error("{0}")]
    Other(String),
}

impl Serialize for ProbeError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of probing one dependency.
///
/// Ephemeral: produced fresh for every invocation of the status endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    /// Configured probe name.
    pub service: String,

    /// True when the probe completed with a success status.
    pub reachable: bool,

    /// Status code returned by the target, when one was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// Failure classification when unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProbeError>,
}

impl ProbeOutcome {
    /// Classify an HTTP response status. Success is [200, 300).
    pub fn from_status(service: impl Into<String>, status: StatusCode) -> Self {
        let code = status.as_u16();
        if status.is_success() {
            Self {
                service: service.into(),
                reachable: true,
                status_code: Some(code),
                error: None,
            }
        } else {
            Self {
                service: service.into(),
                reachable: false,
                status_code: Some(code),
                error: Some(ProbeError::UnexpectedStatus(code)),
            }
        }
    }

    /// Outcome for a probe that never produced a response.
    pub fn failed(service: impl Into<String>, error: ProbeError) -> Self {
        Self {
            service: service.into(),
            reachable: false,
            status_code: None,
            error: Some(error),
        }
    }

    /// Outcome for a successful non-HTTP connectivity check.
    pub fn connected(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            reachable: true,
            status_code: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status_range() {
        let ok = ProbeOutcome::from_status("mlModel", StatusCode::OK);
        assert!(ok.reachable);
        assert_eq!(ok.status_code, Some(200));
        assert!(ok.error.is_none());

        let created = ProbeOutcome::from_status("mlModel", StatusCode::NO_CONTENT);
        assert!(created.reachable);
    }

    #[test]
    fn test_non_success_status_is_unreachable() {
        let outcome = ProbeOutcome::from_status("alertSystem", StatusCode::SERVICE_UNAVAILABLE);
        assert!(!outcome.reachable);
        assert_eq!(outcome.error, Some(ProbeError::UnexpectedStatus(503)));

        let redirect = ProbeOutcome::from_status("alertSystem", StatusCode::MOVED_PERMANENTLY);
        assert!(!redirect.reachable);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ProbeError::Timeout.to_string(), "timed out");
        assert_eq!(
            ProbeError::UnexpectedStatus(503).to_string(),
            "unexpected status 503"
        );
    }

    #[test]
    fn test_outcome_serialization_shape() {
        let outcome = ProbeOutcome::failed("db", ProbeError::ConnectionRefused);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["service"], "db");
        assert_eq!(json["reachable"], false);
        assert_eq!(json["error"], "connection refused");
        assert!(json.get("statusCode").is_none());
    }
}
