use axum::http::StatusCode;
use serde::Deserialize;

use crate::models::Scope;

pub mod dashboard;
pub mod health;
pub mod reports;

/// `?city=` on every read endpoint.
#[derive(Deserialize, Default)]
pub struct ScopeQ {
    pub city: Option<String>,
}

impl ScopeQ {
    pub fn scope(&self) -> Scope {
        Scope::from_param(self.city.as_deref())
    }
}

// Common error mappers
pub fn internal_error<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("internal error: {e}"))
}

pub fn not_found(what: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("not found: {what}"))
}
