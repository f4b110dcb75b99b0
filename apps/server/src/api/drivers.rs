use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};

use fleetdesk_core::drivers::{DriverSummary, Session};

use crate::{error::ApiResult, main_lib::AppState};

/// Roster listing; the service rejects non-administrators.
async fn list_drivers(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<Vec<DriverSummary>>> {
    let drivers = state.driver_service.list_drivers(&session)?;
    Ok(Json(drivers))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/drivers", get(list_drivers))
}
