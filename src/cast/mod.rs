//! Casting: request/outcome types and the multi-device orchestrator

pub mod orchestrator;

pub use orchestrator::CastOrchestrator;

use serde::{Deserialize, Serialize};

/// What to cast and where. Built per orchestration call, never persisted.
#[derive(Debug, Clone)]
pub struct CastRequest {
    /// Device identifiers to cast to, in request order
    pub devices: Vec<String>,

    /// URL the devices should render
    pub url: String,

    /// Content type label sent alongside the URL
    pub content_type: String,

    /// Display title shown by the device
    pub title: String,
}

/// Terminal state of one device's cast attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CastStatus {
    /// Media launch completed
    Success,
    /// The identifier is not in the current device table
    NotFound,
    /// The device could not be reached
    ConnectionError,
    /// The device was reached but a command failed
    Failure,
}

/// Per-device orchestration result
#[derive(Debug, Clone, Serialize)]
pub struct CastOutcome {
    /// The requested device identifier
    pub id: String,

    /// Terminal status
    pub status: CastStatus,

    /// Human-readable description of what happened
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(CastStatus::Success).unwrap(),
            "success"
        );
        assert_eq!(
            serde_json::to_value(CastStatus::NotFound).unwrap(),
            "not-found"
        );
        assert_eq!(
            serde_json::to_value(CastStatus::ConnectionError).unwrap(),
            "connection-error"
        );
        assert_eq!(
            serde_json::to_value(CastStatus::Failure).unwrap(),
            "failure"
        );
    }

    #[test]
    fn outcome_serializes_wire_shape() {
        let outcome = CastOutcome {
            id: "abc-123".to_string(),
            status: CastStatus::Success,
            message: "Transmitido para LivingRoomTV".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["id"], "abc-123");
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Transmitido para LivingRoomTV");
    }
}
