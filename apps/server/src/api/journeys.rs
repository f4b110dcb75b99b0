use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};

use fleetdesk_core::journeys::{Journey, NewJourney};
use fleetdesk_core::drivers::Session;

use crate::{error::ApiResult, main_lib::AppState};

/// Records (or replaces) the caller's journal entry for the submitted date.
async fn record_journey(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(entry): Json<NewJourney>,
) -> ApiResult<Json<Journey>> {
    let journey = state.journey_service.record_journey(&session, entry).await?;
    Ok(Json(journey))
}

/// Own entries for drivers, every driver's entries for administrators.
async fn list_journeys(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<Vec<Journey>>> {
    let journeys = state.journey_service.list_journeys(&session)?;
    Ok(Json(journeys))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/journeys", get(list_journeys).post(record_journey))
}
