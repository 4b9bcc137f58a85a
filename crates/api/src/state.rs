use std::sync::Arc;

use activos_core::scan_parser::ScanParser;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: activos_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Scan payload parser (shares the location table loaded at start-up).
    pub parser: ScanParser,
}
