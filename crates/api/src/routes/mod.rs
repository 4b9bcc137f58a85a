pub mod health;
pub mod registrations;
pub mod scans;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /scans/parse                      parse preview (POST, no write)
///
/// /registrations                    list, register, delete all
/// /registrations/recent             newest N (?limit=)
/// /registrations/import             bulk register (POST)
/// /registrations/export             CSV download (GET)
/// /registrations/{id}               get, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Parse preview.
        .nest("/scans", scans::router())
        // Registration history, duplicate-checked registration and export.
        .nest("/registrations", registrations::router())
}
