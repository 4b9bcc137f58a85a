//! Handlers for scan previews.

use activos_core::scan_parser::{detect_format, validate_raw_code, AssetRecord, PayloadFormat};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::first_filled;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /scans/parse`. Accepts the same code keys as a
/// registration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ParseScanRequest {
    pub codigo_qr: Option<String>,
    pub codigo: Option<String>,
    pub code: Option<String>,
}

/// What the parser made of a scan.
#[derive(Debug, Serialize)]
pub struct ParsedScan {
    pub format: PayloadFormat,
    pub asset: AssetRecord,
}

/// POST /api/v1/scans/parse
///
/// Parse a scan without registering it.
pub async fn parse_scan(
    State(state): State<AppState>,
    Json(input): Json<ParseScanRequest>,
) -> AppResult<impl IntoResponse> {
    let code = first_filled([input.codigo_qr, input.codigo, input.code]).unwrap_or_default();
    let raw = validate_raw_code(&code)?;

    let parsed = ParsedScan {
        format: detect_format(raw),
        asset: state.parser.parse(raw),
    };

    Ok(Json(DataResponse { data: parsed }))
}
