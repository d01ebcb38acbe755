use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub provider: ComponentHealth,
    pub storage: ComponentHealth,
}

#[derive(Serialize)]
pub struct ComponentHealth {
    pub status: String,
}

impl ComponentHealth {
    fn configured(ok: bool) -> Self {
        Self {
            status: if ok { "ok" } else { "not_configured" }.to_string(),
        }
    }
}

/// GET /health — reports whether the external collaborators are configured.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let provider_ok = state.provider.is_configured();
    let storage_ok = state.storage.is_some();

    let all_healthy = provider_ok && storage_ok;
    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if all_healthy {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            provider: ComponentHealth::configured(provider_ok),
            storage: ComponentHealth::configured(storage_ok),
        },
    };

    (status_code, Json(response))
}
