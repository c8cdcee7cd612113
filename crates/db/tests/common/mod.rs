//! Seeded SQLite fixtures for repository tests.

use std::path::PathBuf;

use pricesorter_db::DbPool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

/// Columns the updater writes that the queries depend on, plus a couple of
/// pass-through ones.
const CREATE_TABLE: &str = r#"
    CREATE TABLE "DanDB" (
        "index" INTEGER,
        "Type" TEXT,
        "Stockcode" TEXT,
        "producttitle" TEXT,
        "SinglePricePerStandard" REAL,
        "CasePricePerStandard" REAL,
        "DirectFromSupplier" INTEGER,
        "Promo" INTEGER
    )"#;

/// A listing to insert.
#[derive(Debug, Clone)]
pub struct Seed {
    pub title: &'static str,
    pub category: &'static str,
    pub single: Option<f64>,
    pub case: Option<f64>,
    pub external: bool,
}

pub fn seed(title: &'static str, category: &'static str, single: Option<f64>, case: Option<f64>) -> Seed {
    Seed {
        title,
        category,
        single,
        case,
        external: false,
    }
}

pub fn external(mut s: Seed) -> Seed {
    s.external = true;
    s
}

/// A temporary database file holding the listings table.
pub struct TestDb {
    // Keeps the directory alive for the duration of the test.
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestDb {
    /// Create the table and insert `rows` in order.
    pub async fn with_rows(rows: &[Seed]) -> TestDb {
        let db = TestDb::empty().await;
        let writer = db.writer().await;
        sqlx::query(CREATE_TABLE)
            .execute(&writer)
            .await
            .expect("create table");

        for (i, row) in rows.iter().enumerate() {
            let stockcode = if row.external {
                format!("ER_{i}")
            } else {
                format!("DM_{i}")
            };
            sqlx::query(
                r#"INSERT INTO "DanDB"
                   ("index", "Type", "Stockcode", "producttitle",
                    "SinglePricePerStandard", "CasePricePerStandard", "DirectFromSupplier", "Promo")
                   VALUES (?, ?, ?, ?, ?, ?, ?, 0)"#,
            )
            .bind(i as i64)
            .bind(row.category)
            .bind(stockcode)
            .bind(row.title)
            .bind(row.single)
            .bind(row.case)
            .bind(i64::from(row.external))
            .execute(&writer)
            .await
            .expect("insert row");
        }

        writer.close().await;
        db
    }

    /// A database file with no listings table at all.
    pub async fn empty() -> TestDb {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("listings.db");
        let db = TestDb { _dir: dir, path };
        db.writer().await.close().await;
        db
    }

    pub fn url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }

    /// Read-only pool built the same way the server builds it.
    pub fn pool(&self) -> DbPool {
        pricesorter_db::create_pool(&self.url(), 2).expect("create pool")
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
