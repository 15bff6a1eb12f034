// src/routes/reports.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{internal_error, not_found, ScopeQ};
use crate::{
    filter,
    reports::{self, Dashboard, Panel},
    AppState,
};

/// GET /api/v1/cities
pub async fn list_cities(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    let cities = filter::list_cities(&state.store).await;
    if let Some(failure) = cities.failure {
        return Err(internal_error(failure));
    }
    Ok(Json(filter::scope_options(&cities.value)))
}

/// GET /api/v1/reports
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(q): Query<ScopeQ>,
) -> Json<Dashboard> {
    Json(reports::run_dashboard(&state.store, &q.scope()).await)
}

/// GET /api/v1/reports/:number
pub async fn get_report(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Query(q): Query<ScopeQ>,
) -> Result<Json<Panel>, (StatusCode, String)> {
    // Anything that is not a known report number is a 404, not a 400.
    let def = raw
        .parse::<u8>()
        .ok()
        .and_then(reports::find)
        .ok_or_else(|| not_found(format!("report {raw}")))?;
    Ok(Json(reports::run_report(&state.store, def, &q.scope()).await))
}
