//! Root-level health check.
//!
//! Reports whether the registry can serve scans: the database answers and
//! the location table is loaded.

use activos_db::repositories::RegistrationRepo;
use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Stored registrations; absent when the database is unreachable.
    pub registrations: Option<i64>,
    /// Location variants known to the parser.
    pub location_variants: usize,
    /// Code assigned to unrecognized locations.
    pub default_location_code: String,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let registrations = match RegistrationRepo::count(&state.pool).await {
        Ok(count) => Some(count),
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            None
        }
    };

    let db_healthy = registrations.is_some();
    let locations = state.parser.locations();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        registrations,
        location_variants: locations.len(),
        default_location_code: locations.default_code().to_string(),
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
