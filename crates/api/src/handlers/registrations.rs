//! Handlers for scan registrations.
//!
//! Registering a scan parses it, checks the stored history for the same
//! asset, and only inserts when no match exists. Listings carry the parsed
//! asset next to each stored row.

use activos_core::duplicates::{DuplicateIndex, DuplicateResolver};
use activos_core::error::CoreError;
use activos_core::export::{build_csv, export_filename};
use activos_core::scan_parser::{validate_raw_code, AssetRecord};
use activos_core::types::DbId;
use activos_db::models::scan_registration::{
    CreateScanRegistration, ScanRegistration, DEFAULT_OPERATOR, DEFAULT_SCAN_LOCATION,
};
use activos_db::repositories::RegistrationRepo;
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::first_filled;
use crate::query::{clamp_limit, LimitParams, DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound on the number of codes accepted by one import request.
const MAX_IMPORT_CODES: usize = 1000;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /registrations`.
///
/// Scanner clients send Spanish keys, other clients English ones. Each
/// spelling is its own field so a body carrying several is still accepted;
/// the first non-blank value wins, Spanish first.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterScanRequest {
    pub codigo_qr: Option<String>,
    pub codigo: Option<String>,
    pub code: Option<String>,
    pub usuario: Option<String>,
    pub operator: Option<String>,
    pub ubicacion: Option<String>,
    pub scan_location: Option<String>,
    pub notas: Option<String>,
    pub notes: Option<String>,
}

/// Request body for `POST /registrations/import`. Same key rules as
/// [`RegisterScanRequest`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ImportScansRequest {
    pub codigos: Option<Vec<String>>,
    pub codes: Option<Vec<String>>,
    pub usuario: Option<String>,
    pub operator: Option<String>,
    pub ubicacion: Option<String>,
    pub scan_location: Option<String>,
}

/// A stored registration together with its parsed asset.
#[derive(Debug, Serialize)]
pub struct RegisteredAsset {
    #[serde(flatten)]
    pub registration: ScanRegistration,
    pub asset: AssetRecord,
}

/// Result of `POST /registrations`.
#[derive(Debug, Serialize)]
pub struct RegistrationOutcome {
    pub already_registered: bool,
    pub registration: ScanRegistration,
    pub asset: AssetRecord,
    pub message: String,
}

/// What happened to one code of an import batch.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    Created { registration_id: DbId, name: String },
    AlreadyRegistered { registration_id: DbId, name: String },
    DuplicateInBatch { first_position: usize, name: String },
    Rejected { reason: String },
}

#[derive(Debug, Serialize)]
pub struct ImportItem {
    pub position: usize,
    pub code: String,
    #[serde(flatten)]
    pub outcome: ImportOutcome,
}

/// Result of `POST /registrations/import`.
#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
    pub created: usize,
    pub already_registered: usize,
    pub duplicate_in_batch: usize,
    pub rejected: usize,
    pub items: Vec<ImportItem>,
}

impl ImportSummary {
    fn push(&mut self, position: usize, code: String, outcome: ImportOutcome) {
        match &outcome {
            ImportOutcome::Created { .. } => self.created += 1,
            ImportOutcome::AlreadyRegistered { .. } => self.already_registered += 1,
            ImportOutcome::DuplicateInBatch { .. } => self.duplicate_in_batch += 1,
            ImportOutcome::Rejected { .. } => self.rejected += 1,
        }
        self.items.push(ImportItem {
            position,
            code,
            outcome,
        });
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedRegistration {
    pub deleted_id: DbId,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedAll {
    pub deleted_count: u64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A trimmed, non-blank value or the given default.
fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn with_asset(state: &AppState, registration: ScanRegistration) -> RegisteredAsset {
    let asset = state.parser.parse(&registration.code);
    RegisteredAsset {
        registration,
        asset,
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ScanRegistration",
        id,
    })
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// POST /api/v1/registrations
///
/// Register a scan unless the same asset is already stored.
/// Returns 201 for a new registration, 200 with the existing one otherwise.
pub async fn register_scan(
    State(state): State<AppState>,
    Json(input): Json<RegisterScanRequest>,
) -> AppResult<impl IntoResponse> {
    let code = first_filled([input.codigo_qr, input.codigo, input.code]).unwrap_or_default();
    validate_raw_code(&code)?;

    let asset = state.parser.parse(&code);

    let stored = RegistrationRepo::scan_all(&state.pool).await;
    let resolver = DuplicateResolver::new(&state.parser);

    if let Some(existing) = resolver.find_existing(&asset, stored) {
        tracing::info!(
            registration_id = existing.id,
            name = %asset.name,
            "Scan matches an existing registration",
        );

        let existing_asset = state.parser.parse(&existing.code);
        let outcome = RegistrationOutcome {
            already_registered: true,
            message: format!(
                "El activo \"{}\" ya está registrado con estas características",
                existing_asset.name
            ),
            registration: existing,
            asset: existing_asset,
        };
        return Ok((StatusCode::OK, Json(DataResponse { data: outcome })));
    }

    let create = CreateScanRegistration {
        operator: or_default(
            first_filled([input.usuario, input.operator]),
            DEFAULT_OPERATOR,
        ),
        scan_location: or_default(
            first_filled([input.ubicacion, input.scan_location]),
            DEFAULT_SCAN_LOCATION,
        ),
        notes: or_default(
            first_filled([input.notas, input.notes]),
            &format!("Activo registrado: {}", asset.name),
        ),
        code,
    };
    let registration = RegistrationRepo::create(&state.pool, &create).await?;

    tracing::info!(
        registration_id = registration.id,
        name = %asset.name,
        location_code = %asset.location_code,
        "Scan registered",
    );

    let outcome = RegistrationOutcome {
        already_registered: false,
        message: format!("Activo \"{}\" registrado correctamente", asset.name),
        registration,
        asset,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// POST /api/v1/registrations/import
///
/// Register a batch of scans. Each code is checked against storage and
/// against the earlier codes of the same batch.
pub async fn import_scans(
    State(state): State<AppState>,
    Json(input): Json<ImportScansRequest>,
) -> AppResult<impl IntoResponse> {
    let codes = [input.codigos, input.codes]
        .into_iter()
        .flatten()
        .find(|codes| !codes.is_empty())
        .unwrap_or_default();

    if codes.is_empty() {
        return Err(AppError::BadRequest("No codes to import".to_string()));
    }
    if codes.len() > MAX_IMPORT_CODES {
        return Err(AppError::BadRequest(format!(
            "At most {MAX_IMPORT_CODES} codes can be imported at once"
        )));
    }

    let operator = or_default(first_filled([input.usuario, input.operator]), DEFAULT_OPERATOR);
    let scan_location = or_default(
        first_filled([input.ubicacion, input.scan_location]),
        DEFAULT_SCAN_LOCATION,
    );

    let resolver = DuplicateResolver::new(&state.parser);
    let stored = resolver.build_index(RegistrationRepo::scan_all(&state.pool).await);
    let mut batch: DuplicateIndex<usize> = DuplicateIndex::new();
    let mut summary = ImportSummary::default();

    for (position, code) in codes.into_iter().enumerate() {
        if let Err(err) = validate_raw_code(&code) {
            summary.push(
                position,
                code,
                ImportOutcome::Rejected {
                    reason: err.to_string(),
                },
            );
            continue;
        }

        let asset = state.parser.parse(&code);

        if let Some(existing) = stored.find(&asset) {
            let outcome = ImportOutcome::AlreadyRegistered {
                registration_id: existing.id,
                name: asset.name,
            };
            summary.push(position, code, outcome);
            continue;
        }

        if let Some(&first_position) = batch.find(&asset) {
            let outcome = ImportOutcome::DuplicateInBatch {
                first_position,
                name: asset.name,
            };
            summary.push(position, code, outcome);
            continue;
        }

        let create = CreateScanRegistration {
            code: code.clone(),
            operator: operator.clone(),
            scan_location: scan_location.clone(),
            notes: format!("Activo registrado: {}", asset.name),
        };
        let registration = RegistrationRepo::create(&state.pool, &create).await?;
        batch.insert(&asset, position);

        summary.push(
            position,
            code,
            ImportOutcome::Created {
                registration_id: registration.id,
                name: asset.name,
            },
        );
    }

    tracing::info!(
        created = summary.created,
        already_registered = summary.already_registered,
        duplicate_in_batch = summary.duplicate_in_batch,
        rejected = summary.rejected,
        "Scan import finished",
    );

    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// GET /api/v1/registrations
///
/// List every registration, newest first.
pub async fn list_registrations(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let registrations = RegistrationRepo::list(&state.pool).await?;

    let items: Vec<RegisteredAsset> = registrations
        .into_iter()
        .map(|r| with_asset(&state, r))
        .collect();

    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/registrations/recent?limit=
pub async fn list_recent_registrations(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT);
    let registrations = RegistrationRepo::list_recent(&state.pool, limit).await?;

    let items: Vec<RegisteredAsset> = registrations
        .into_iter()
        .map(|r| with_asset(&state, r))
        .collect();

    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/registrations/{id}
pub async fn get_registration(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let registration = RegistrationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse {
        data: with_asset(&state, registration),
    }))
}

/// DELETE /api/v1/registrations/{id}
pub async fn delete_registration(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = RegistrationRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let name = state.parser.parse(&deleted.code).name;
    tracing::info!(registration_id = id, name = %name, "Registration deleted");

    Ok(Json(DataResponse {
        data: DeletedRegistration {
            deleted_id: id,
            name,
        },
    }))
}

/// DELETE /api/v1/registrations
///
/// Remove the whole history.
pub async fn delete_all_registrations(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let deleted_count = RegistrationRepo::delete_all(&state.pool).await?;

    tracing::info!(deleted_count, "All registrations deleted");

    Ok(Json(DataResponse {
        data: DeletedAll { deleted_count },
    }))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// GET /api/v1/registrations/export
///
/// Download the history as CSV, newest first.
pub async fn export_registrations(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let registrations = RegistrationRepo::list(&state.pool).await?;
    let assets: Vec<AssetRecord> = registrations
        .iter()
        .map(|r| state.parser.parse(&r.code))
        .collect();

    let offset = state.config.export_offset();
    let csv = build_csv(
        registrations.iter().map(|r| &r.created_at).zip(&assets),
        offset,
    );
    let filename = export_filename(&chrono::Utc::now(), offset);

    tracing::info!(rows = assets.len(), filename = %filename, "Registrations exported");

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}
