// src/main.rs

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod filter;
mod models;
mod render;
mod reports;
mod routes;
#[cfg(test)]
mod testing;

use config::AppConfig;
use db::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

fn app(state: AppState) -> Router {
    // Read-only surface: the page itself plus JSON mirrors of it.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::dashboard::page))
        .route("/health", get(routes::health::health))
        .route("/api/v1/cities", get(routes::reports::list_cities))
        .route("/api/v1/reports", get(routes::reports::get_dashboard))
        .route("/api/v1/reports/:number", get(routes::reports::get_report))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cfg = AppConfig::from_env();

    // Opened once; a missing file still starts the server in degraded mode.
    let store = db::open(&cfg.database_path).await;
    let state = AppState { store };

    let addr = cfg.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, db = %cfg.database_path.display(), "dashboard listening");

    axum::serve(listener, app(state).into_make_service()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get(store: Store, uri: &str) -> (StatusCode, String) {
        let resp = app(AppState { store })
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_reports_store_state() {
        let (status, body) = get(testing::empty_store().await, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["store"], "ready");

        let missing = Store::Missing { path: "gone.db".into() };
        let (_, body) = get(missing, "/health").await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["status"], "ok");
        assert_eq!(v["store"], "missing");

        let broken = Store::Unavailable { reason: "file is not a database".into() };
        let (_, body) = get(broken, "/health").await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["store"], "unavailable");
    }

    #[tokio::test]
    async fn cities_endpoint_lists_scope_options() {
        let (status, body) = get(testing::sample_store().await, "/api/v1/cities").await;
        assert_eq!(status, StatusCode::OK);
        let v: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(v, vec!["All Cities", "Gotham", "Metropolis", "Smallville", "Star City"]);
    }

    #[tokio::test]
    async fn single_report_honours_city_param() {
        let store = testing::single_city_store().await;
        let (status, body) = get(store, "/api/v1/reports/13?city=Metropolis").await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["number"], 13);
        assert_eq!(v["body"]["kind"], "table");
        assert_eq!(v["body"]["table"]["rows"][0][0], "A");
        assert_eq!(v["body"]["table"]["rows"][0][1], 5);
    }

    #[tokio::test]
    async fn city_param_with_spaces_is_decoded() {
        let store = testing::sample_store().await;
        let (_, body) = get(store, "/api/v1/reports/3?city=Star%20City").await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["body"]["table"]["rows"][0][0], "City Diner");
    }

    #[tokio::test]
    async fn unknown_report_is_not_found() {
        for (uri, name) in [
            ("/api/v1/reports/14", "report 14"),
            ("/api/v1/reports/0", "report 0"),
            ("/api/v1/reports/300", "report 300"),
            ("/api/v1/reports/abc", "report abc"),
        ] {
            let (status, body) = get(testing::empty_store().await, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert!(body.contains(name), "{uri}: {body}");
        }
    }

    #[tokio::test]
    async fn dashboard_json_has_every_panel() {
        let (status, body) = get(testing::sample_store().await, "/api/v1/reports?city=All%20Cities").await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["scope"], "All Cities");
        assert_eq!(v["panels"].as_array().unwrap().len(), 13);
        assert_eq!(v["panels"][2]["body"]["kind"], "placeholder");
        assert!(v["banner"].is_null());
    }

    #[tokio::test]
    async fn page_renders_even_without_a_store() {
        let missing = Store::Missing { path: "food_wastage.db".into() };
        let (status, body) = get(missing, "/?city=Metropolis").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.contains("not found"));
        assert!(body.contains("No data for selected city: Metropolis."));
    }
}
