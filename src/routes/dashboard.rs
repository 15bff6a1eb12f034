// src/routes/dashboard.rs

use axum::{
    extract::{Query, State},
    response::Html,
};

use super::ScopeQ;
use crate::{render, reports, AppState};

/// GET /  (full page; every report re-runs on each request)
pub async fn page(State(state): State<AppState>, Query(q): Query<ScopeQ>) -> Html<String> {
    let dashboard = reports::run_dashboard(&state.store, &q.scope()).await;
    Html(render::render_page(&dashboard))
}
