//! Repository for the `scan_registrations` table.

use activos_core::types::DbId;
use futures::StreamExt;
use sqlx::PgPool;

use crate::models::scan_registration::{CreateScanRegistration, ScanRegistration};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, operator, scan_location, notes, created_at";

/// Provides create, read and delete operations for scan registrations.
/// Registrations are never updated.
pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Insert a new registration, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateScanRegistration,
    ) -> Result<ScanRegistration, sqlx::Error> {
        let query = format!(
            "INSERT INTO scan_registrations (code, operator, scan_location, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScanRegistration>(&query)
            .bind(&input.code)
            .bind(&input.operator)
            .bind(&input.scan_location)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a registration by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ScanRegistration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scan_registrations WHERE id = $1");
        sqlx::query_as::<_, ScanRegistration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all registrations, most recent first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ScanRegistration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scan_registrations ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ScanRegistration>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the `limit` most recent registrations.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<ScanRegistration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scan_registrations
             ORDER BY created_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, ScanRegistration>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Read every registration in insertion order, one result per row.
    ///
    /// Unlike [`list`](Self::list), a row that fails to decode does not fail
    /// the whole read: it shows up as an `Err` item so duplicate detection
    /// can skip it and keep going.
    pub async fn scan_all(pool: &PgPool) -> Vec<Result<ScanRegistration, sqlx::Error>> {
        let query = format!("SELECT {COLUMNS} FROM scan_registrations ORDER BY id ASC");
        let rows: Vec<_> = sqlx::query_as::<_, ScanRegistration>(&query)
            .fetch(pool)
            .collect()
            .await;

        let failed = rows.iter().filter(|row| row.is_err()).count();
        tracing::debug!(rows = rows.len(), failed, "Scanned stored registrations");
        rows
    }

    /// Count all registrations.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scan_registrations")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Delete a registration by ID, returning the deleted row if it existed.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ScanRegistration>, sqlx::Error> {
        let query = format!("DELETE FROM scan_registrations WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, ScanRegistration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete every registration. Returns the number of rows removed.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scan_registrations")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
