#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use pricesorter_api::config::ServerConfig;
use pricesorter_api::error::ErrorPolicy;
use pricesorter_api::router::build_app_router;
use pricesorter_api::state::AppState;
use pricesorter_core::freshness::FreshnessTracker;
use pricesorter_db::DbPool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;
use tower::ServiceExt;

/// Freshness value every test app starts from.
pub const START_EPOCH: i64 = 1_700_000_000;

const CREATE_TABLE: &str = r#"
    CREATE TABLE "DanDB" (
        "index" INTEGER,
        "Type" TEXT,
        "Stockcode" TEXT,
        "producttitle" TEXT,
        "SinglePricePerStandard" REAL,
        "CasePricePerStandard" REAL,
        "DirectFromSupplier" INTEGER
    )"#;

/// One listing row: title, category, single price, case price, external.
pub type Row = (&'static str, &'static str, Option<f64>, Option<f64>, bool);

/// Build a test `ServerConfig` with safe defaults.
///
/// The scheduler is disabled; nothing in the API tests should spawn the
/// updater.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServerConfig::default()
    };
    config.updater.enabled = false;
    config
}

/// A temporary listings database file.
pub struct TestDb {
    _dir: TempDir,
    path: PathBuf,
}

impl TestDb {
    pub async fn with_rows(rows: &[Row]) -> TestDb {
        let db = TestDb::empty().await;
        let writer = db.writer().await;
        sqlx::query(CREATE_TABLE)
            .execute(&writer)
            .await
            .expect("create table");

        for (i, (title, category, single, case, external)) in rows.iter().enumerate() {
            let prefix = if *external { "ER" } else { "DM" };
            sqlx::query(
                r#"INSERT INTO "DanDB"
                   ("index", "Type", "Stockcode", "producttitle",
                    "SinglePricePerStandard", "CasePricePerStandard", "DirectFromSupplier")
                   VALUES (?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(i as i64)
            .bind(*category)
            .bind(format!("{prefix}_{i}"))
            .bind(*title)
            .bind(*single)
            .bind(*case)
            .bind(i64::from(*external))
            .execute(&writer)
            .await
            .expect("insert row");
        }

        writer.close().await;
        db
    }

    /// A database file without the listings table.
    pub async fn empty() -> TestDb {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("danDB.db");
        let db = TestDb { _dir: dir, path };
        db.writer().await.close().await;
        db
    }

    pub fn pool(&self) -> DbPool {
        pricesorter_db::create_pool(&format!("sqlite://{}", self.path.display()), 2)
            .expect("create pool")
    }

    async fn writer(&self) -> DbPool {
        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("open writer")
    }
}

/// Build the full application router over `pool` with the default config.
pub fn build_test_app(pool: DbPool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Build the full application router with a custom error policy.
pub fn build_test_app_with_policy(pool: DbPool, policy: ErrorPolicy) -> Router {
    let mut config = test_config();
    config.error_policy = policy;
    build_test_app_with(pool, config)
}

pub fn build_test_app_with(pool: DbPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config),
        freshness: Arc::new(FreshnessTracker::starting_at(START_EPOCH)),
    };
    build_app_router(state)
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Titles of the listings in a `{ "pass": true, "data": [...] }` body.
pub fn titles(json: &serde_json::Value) -> Vec<String> {
    json["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|row| row["producttitle"].as_str().unwrap_or_default().to_string())
        .collect()
}
