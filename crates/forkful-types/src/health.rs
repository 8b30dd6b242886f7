//! Backend health check payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Result of the backend's health endpoint.
///
/// `services` maps each backend dependency (cache, vector store, ...) to a
/// status word such as "healthy" or "disconnected".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub services: BTreeMap<String, String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }

    /// Names of services not reporting "healthy".
    pub fn degraded_services(&self) -> Vec<&str> {
        self.services
            .iter()
            .filter(|(_, status)| status.as_str() != "healthy")
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_services() {
        let health: HealthStatus = serde_json::from_value(serde_json::json!({
            "status": "degraded",
            "version": "1.0.0",
            "environment": "development",
            "services": {"cache": "healthy", "mcp_server": "disconnected", "vector_db": "healthy"}
        }))
        .unwrap();
        assert!(!health.is_healthy());
        assert_eq!(health.degraded_services(), vec!["mcp_server"]);
    }

    #[test]
    fn test_minimal_payload() {
        let health: HealthStatus = serde_json::from_str(r#"{"status":"healthy"}"#).unwrap();
        assert!(health.is_healthy());
        assert!(health.services.is_empty());
    }
}
