use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};

use fleetdesk_core::drivers::Session;
use fleetdesk_core::settlements::{NewSettlement, Settlement};

use crate::{error::ApiResult, main_lib::AppState};

/// Records (or replaces) the caller's settlement for the submitted date.
/// The amount owed to the company is recomputed server-side; any submitted
/// value is discarded.
async fn record_settlement(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(input): Json<NewSettlement>,
) -> ApiResult<Json<Settlement>> {
    let settlement = state
        .settlement_service
        .record_settlement(&session, input)
        .await?;
    Ok(Json(settlement))
}

async fn list_settlements(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<Vec<Settlement>>> {
    let settlements = state.settlement_service.list_settlements(&session)?;
    Ok(Json(settlements))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/settlements",
        get(list_settlements).post(record_settlement),
    )
}
