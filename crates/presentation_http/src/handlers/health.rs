//! Health check handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub key_store: KeyStoreStatus,
    pub database: DatabaseStatus,
}

/// Key store the facades were bound to at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyStoreStatus {
    /// `redis` or `memory`
    pub backend: String,
    pub responsive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseStatus {
    pub available: bool,
}

/// Readiness check - is the server ready to accept requests?
///
/// An unresponsive key store does not fail readiness: the facades keep
/// serving in their degraded modes. The account database does.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let (responsive, available) = tokio::join!(
        state.cache.is_responsive(),
        state.repository.is_available()
    );

    let ready = available;
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready,
            key_store: KeyStoreStatus {
                backend: state.cache.backend_kind().as_str().to_string(),
                responsive,
            },
            database: DatabaseStatus { available },
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serialization() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("status"));
        assert!(json.contains("ok"));
        assert!(json.contains("version"));
    }

    #[test]
    fn readiness_response_shape() {
        let resp = ReadinessResponse {
            ready: true,
            key_store: KeyStoreStatus {
                backend: "memory".to_string(),
                responsive: true,
            },
            database: DatabaseStatus { available: true },
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["key_store"]["backend"], "memory");
        assert_eq!(json["database"]["available"], true);
    }

    #[tokio::test]
    async fn health_check_reports_version() {
        let Json(resp) = health_check().await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));
    }
}
