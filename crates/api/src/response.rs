//! Response envelope for API handlers.
//!
//! Every JSON success body is `{ "data": ... }`: a registration outcome, a
//! list of registered assets, an import summary, a parse preview. Errors use
//! the `{ "error", "code" }` shape from [`AppError`](crate::error::AppError)
//! instead. The CSV export is the one response without an envelope.

use serde::Serialize;

/// `{ "data": T }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
