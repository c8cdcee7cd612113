//! Repository for the listings table.
//!
//! Read-only: the table is dropped and recreated by the external updater.

use pricesorter_core::category::Category;
use pricesorter_core::listing_query::{
    count_statement, BindValue, ListingQuery, SearchText, Statement, LISTING_TABLE,
};
use pricesorter_core::paging::PageRequest;
use sqlx::Sqlite;

use crate::models::Listing;
use crate::DbPool;

/// Provides paged listing queries ordered by price-per-standard.
pub struct ListingRepo;

impl ListingRepo {
    /// Execute any listing query and return its page of rows.
    pub async fn fetch_page(pool: &DbPool, query: &ListingQuery) -> Result<Vec<Listing>, sqlx::Error> {
        let Statement { sql, params } = query.statement();

        let mut q = sqlx::query_as::<Sqlite, Listing>(&sql);
        for param in &params {
            q = match param {
                BindValue::Text(s) => q.bind(s.as_str()),
                BindValue::Integer(n) => q.bind(*n),
            };
        }

        let rows = q.fetch_all(pool).await?;
        tracing::debug!(
            rows = rows.len(),
            page = query.page().page,
            max_supplier_flag = query.page().supplier.max_flag(),
            "Listing page fetched"
        );
        Ok(rows)
    }

    /// Cheapest listings within one category.
    pub async fn by_category(
        pool: &DbPool,
        category: Category,
        page: PageRequest,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        Self::fetch_page(pool, &ListingQuery::Category { category, page }).await
    }

    /// Cheapest listings across every category.
    pub async fn top(pool: &DbPool, page: PageRequest) -> Result<Vec<Listing>, sqlx::Error> {
        Self::fetch_page(pool, &ListingQuery::Top { page }).await
    }

    /// Cheapest listings whose title contains `text`.
    pub async fn search(
        pool: &DbPool,
        text: SearchText,
        page: PageRequest,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        Self::fetch_page(pool, &ListingQuery::Search { text, page }).await
    }

    /// Whether the updater has created the listings table yet.
    pub async fn table_exists(pool: &DbPool) -> Result<bool, sqlx::Error> {
        let found = sqlx::query_scalar::<Sqlite, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(LISTING_TABLE)
        .fetch_one(pool)
        .await?;
        Ok(found > 0)
    }

    /// Total number of listings in the table.
    pub async fn count(pool: &DbPool) -> Result<i64, sqlx::Error> {
        let Statement { sql, .. } = count_statement();
        sqlx::query_scalar::<Sqlite, i64>(&sql).fetch_one(pool).await
    }
}
