//! Route definitions for scan previews.

use axum::routing::post;
use axum::Router;

use crate::handlers::scans;
use crate::state::AppState;

/// Routes mounted at `/scans`.
///
/// ```text
/// POST /parse  -> parse_scan
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/parse", post(scans::parse_scan))
}
