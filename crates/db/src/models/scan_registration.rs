//! Scan registration model and DTOs.

use activos_core::duplicates::RawScan;
use activos_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Operator recorded when the client does not name one.
pub const DEFAULT_OPERATOR: &str = "Usuario Web";

/// Scan location recorded when the client does not send one.
pub const DEFAULT_SCAN_LOCATION: &str = "Escáner Web";

/// A row from the `scan_registrations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScanRegistration {
    pub id: DbId,
    /// The raw scanned payload, exactly as received.
    pub code: String,
    pub operator: String,
    pub scan_location: String,
    pub notes: String,
    pub created_at: Timestamp,
}

impl RawScan for ScanRegistration {
    fn raw_code(&self) -> &str {
        &self.code
    }
}

/// DTO for inserting a new registration.
#[derive(Debug, Clone)]
pub struct CreateScanRegistration {
    pub code: String,
    pub operator: String,
    pub scan_location: String,
    pub notes: String,
}
