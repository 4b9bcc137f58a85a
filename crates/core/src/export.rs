//! Spreadsheet export of registered assets.
//!
//! Produces a CSV document (one row per registration) that opens directly in
//! spreadsheet software. Timestamps are rendered in a fixed UTC offset chosen
//! by the deployment.

use chrono::{FixedOffset, Offset, Utc};

use crate::scan_parser::AssetRecord;
use crate::types::Timestamp;

/// Column headers, in output order.
pub const EXPORT_HEADERS: [&str; 7] = [
    "Código QR",
    "Activo",
    "Ubicación",
    "Marca",
    "Modelo",
    "No. de Serie",
    "Fecha de Registro",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Build a UTC offset from whole hours. Out-of-range values yield UTC.
pub fn utc_offset(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Render a timestamp as `YYYY-mm-dd HH:MM:SS` in the given offset.
pub fn format_timestamp(ts: &Timestamp, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string()
}

/// Download filename for an export generated at `now`.
pub fn export_filename(now: &Timestamp, offset: FixedOffset) -> String {
    format!(
        "activos_escaneados_{}.csv",
        now.with_timezone(&offset).format(FILENAME_TIMESTAMP_FORMAT)
    )
}

/// Escape a value for CSV: wrap in quotes if it contains a comma, quote or line break.
fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Build the export document from `(registered_at, asset)` rows.
///
/// The code column carries the location code as well, e.g. `SILEJE (GER)`.
pub fn build_csv<'a, I>(rows: I, offset: FixedOffset) -> String
where
    I: IntoIterator<Item = (&'a Timestamp, &'a AssetRecord)>,
{
    let mut lines = vec![EXPORT_HEADERS.join(",")];

    for (registered_at, asset) in rows {
        let code = format!("{} ({})", asset.code, asset.location_code);
        let registered_at = format_timestamp(registered_at, offset);
        let fields: [&str; 7] = [
            &code,
            &asset.name,
            &asset.location,
            &asset.brand,
            &asset.model,
            &asset.serial_number,
            &registered_at,
        ];
        let row = fields.map(csv_escape);
        lines.push(row.join(","));
    }

    lines.join("\n")
}
