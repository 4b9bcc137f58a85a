use std::path::PathBuf;

use activos_core::error::CoreError;
use activos_core::export::utc_offset;
use activos_core::locations::LocationTable;
use chrono::FixedOffset;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Hours east of UTC used for timestamps in exports (default: `-6`).
    pub export_utc_offset_hours: i32,
    /// Optional JSON file replacing the built-in location table.
    pub location_table_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `EXPORT_UTC_OFFSET_HOURS` | `-6`                       |
    /// | `LOCATION_TABLE_PATH`     | unset (built-in table)     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let export_utc_offset_hours: i32 = std::env::var("EXPORT_UTC_OFFSET_HOURS")
            .unwrap_or_else(|_| "-6".into())
            .parse()
            .expect("EXPORT_UTC_OFFSET_HOURS must be a whole number of hours");

        let location_table_path = std::env::var("LOCATION_TABLE_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            export_utc_offset_hours,
            location_table_path,
        }
    }

    /// UTC offset applied to exported timestamps.
    pub fn export_offset(&self) -> FixedOffset {
        utc_offset(self.export_utc_offset_hours)
    }

    /// Load the location table: from `location_table_path` when set,
    /// otherwise the built-in table.
    pub fn load_location_table(&self) -> Result<LocationTable, CoreError> {
        let Some(path) = &self.location_table_path else {
            return Ok(LocationTable::default());
        };

        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Validation(format!(
                "Cannot read location table '{}': {e}",
                path.display()
            ))
        })?;
        LocationTable::from_json(&json)
    }
}
