use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Extension, Json, Router,
};

use fleetdesk_core::closures::MonthlyClosure;
use fleetdesk_core::drivers::Session;
use fleetdesk_core::statements::{IngestReport, StatementUpload};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Accepts a multipart batch of monthly statement files (`files` fields)
/// and attaches them to the driver's closure row.
async fn upload_statements(
    State(state): State<Arc<AppState>>,
    Path((driver_id, year, month)): Path<(String, i32, u32)>,
    Extension(session): Extension<Session>,
    mut multipart: Multipart,
) -> ApiResult<Json<IngestReport>> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {e}")))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let original_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "statement".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read uploaded file: {e}")))?;
        uploads.push(StatementUpload {
            original_name,
            bytes: bytes.to_vec(),
        });
    }

    let report = state
        .statement_service
        .ingest(&session, &driver_id, year, month, uploads)
        .await?;
    Ok(Json(report))
}

/// Recomputes the month's totals and reconciles them against the
/// statements on file. Re-runnable; each run replaces the stored result.
async fn process_closure(
    State(state): State<Arc<AppState>>,
    Path((driver_id, year, month)): Path<(String, i32, u32)>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<MonthlyClosure>> {
    let closure = state
        .closure_service
        .process(&session, &driver_id, year, month)
        .await?;
    Ok(Json(closure))
}

async fn get_closure(
    State(state): State<Arc<AppState>>,
    Path((driver_id, year, month)): Path<(String, i32, u32)>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<MonthlyClosure>> {
    let closure = state
        .closure_service
        .get_closure(&session, &driver_id, year, month)?;
    Ok(Json(closure))
}

async fn list_closures(
    State(state): State<Arc<AppState>>,
    Path(driver_id): Path<String>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<Vec<MonthlyClosure>>> {
    let closures = state.closure_service.list_closures(&session, &driver_id)?;
    Ok(Json(closures))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/closures/{driver_id}", get(list_closures))
        .route("/closures/{driver_id}/{year}/{month}", get(get_closure))
        .route(
            "/closures/{driver_id}/{year}/{month}/statements",
            post(upload_statements),
        )
        .route(
            "/closures/{driver_id}/{year}/{month}/process",
            post(process_closure),
        )
}
