//! Route definitions for scan registrations.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::registrations;
use crate::state::AppState;

/// Routes mounted at `/registrations`.
///
/// ```text
/// GET    /          -> list_registrations
/// POST   /          -> register_scan
/// DELETE /          -> delete_all_registrations
/// GET    /recent    -> list_recent_registrations
/// POST   /import    -> import_scans
/// GET    /export    -> export_registrations
/// GET    /{id}      -> get_registration
/// DELETE /{id}      -> delete_registration
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(registrations::list_registrations)
                .post(registrations::register_scan)
                .delete(registrations::delete_all_registrations),
        )
        .route("/recent", get(registrations::list_recent_registrations))
        .route("/import", post(registrations::import_scans))
        .route("/export", get(registrations::export_registrations))
        .route(
            "/{id}",
            get(registrations::get_registration).delete(registrations::delete_registration),
        )
}
