//! Integration tests for `ListingRepo` against a seeded SQLite file.
//!
//! Covers category/supplier filtering, price-per-standard ordering with the
//! case-price fallback, paging, title search and the product count.

mod common;

use common::{external, seed, Seed, TestDb};
use pricesorter_core::category::Category;
use pricesorter_core::listing_query::SearchText;
use pricesorter_core::paging::{PageRequest, SupplierFilter, PAGE_SIZE};
use pricesorter_db::repositories::ListingRepo;

fn page(n: i64, supplier: SupplierFilter) -> PageRequest {
    PageRequest { page: n, supplier }
}

fn titles(rows: &[pricesorter_db::models::Listing]) -> Vec<&str> {
    rows.iter().filter_map(|r| r.title()).collect()
}

fn mixed_catalogue() -> Vec<Seed> {
    vec![
        seed("Smirnoff Red", "spirits", Some(1.2), None),
        seed("Cheap Gin", "spirits", Some(0.8), Some(0.7)),
        seed("Case Only Rum", "spirits", None, Some(1.0)),
        external(seed("Imported Vodka", "spirits", Some(0.5), None)),
        seed("Goon Sack", "white wine", Some(0.3), None),
        seed("Lager Block", "beer", None, Some(1.1)),
    ]
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[tokio::test]
async fn category_returns_only_that_category_sorted_by_price() {
    let db = TestDb::with_rows(&mixed_catalogue()).await;
    let pool = db.pool();

    let rows = ListingRepo::by_category(&pool, Category::Spirits, PageRequest::default())
        .await
        .expect("query");

    assert_eq!(titles(&rows), vec!["Cheap Gin", "Case Only Rum", "Smirnoff Red"]);
    assert!(rows.iter().all(|r| r.category() == Some("spirits")));
}

#[tokio::test]
async fn external_suppliers_are_excluded_by_default() {
    let db = TestDb::with_rows(&mixed_catalogue()).await;
    let pool = db.pool();

    let rows = ListingRepo::by_category(&pool, Category::Spirits, PageRequest::default())
        .await
        .expect("query");

    assert!(rows.iter().all(|r| r.supplier_flag() == Some(0)));
}

#[tokio::test]
async fn external_suppliers_are_included_when_allowed() {
    let db = TestDb::with_rows(&mixed_catalogue()).await;
    let pool = db.pool();

    let rows = ListingRepo::by_category(
        &pool,
        Category::Spirits,
        page(0, SupplierFilter::IncludeExternal),
    )
    .await
    .expect("query");

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].title(), Some("Imported Vodka"));
}

#[tokio::test]
async fn empty_category_returns_no_rows() {
    let db = TestDb::with_rows(&mixed_catalogue()).await;
    let pool = db.pool();

    let rows = ListingRepo::by_category(&pool, Category::Cider, PageRequest::default())
        .await
        .expect("query");

    assert!(rows.is_empty());
}

// ---------------------------------------------------------------------------
// Top + paging
// ---------------------------------------------------------------------------

#[tokio::test]
async fn top_spans_categories_in_price_order() {
    let db = TestDb::with_rows(&mixed_catalogue()).await;
    let pool = db.pool();

    let rows = ListingRepo::top(&pool, PageRequest::default()).await.expect("query");

    assert_eq!(
        titles(&rows),
        vec!["Goon Sack", "Cheap Gin", "Case Only Rum", "Lager Block", "Smirnoff Red"]
    );
}

#[tokio::test]
async fn pages_hold_at_most_page_size_and_continue_in_order() {
    let rows: Vec<Seed> = (0..40)
        .map(|i| {
            // Interleave single-priced and case-only rows.
            let price = f64::from(40 - i) / 10.0;
            if i % 3 == 0 {
                seed("Case Beer", "beer", None, Some(price))
            } else {
                seed("Single Beer", "beer", Some(price), None)
            }
        })
        .collect();
    let db = TestDb::with_rows(&rows).await;
    let pool = db.pool();

    let mut previous_last: Option<f64> = None;
    let mut total = 0;
    for n in 0..3 {
        let rows = ListingRepo::top(&pool, page(n, SupplierFilter::PrimaryOnly))
            .await
            .expect("query");
        assert!(rows.len() as i64 <= PAGE_SIZE);
        total += rows.len();

        let keys: Vec<f64> = rows.iter().map(|r| r.sort_key().expect("sort key")).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]), "page {n} unsorted: {keys:?}");
        if let (Some(prev), Some(first)) = (previous_last, keys.first()) {
            assert!(*first >= prev, "page {n} starts below previous page");
        }
        previous_last = keys.last().copied().or(previous_last);
    }
    assert_eq!(total, 40);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let db = TestDb::with_rows(&mixed_catalogue()).await;
    let pool = db.pool();

    let rows = ListingRepo::top(&pool, page(10, SupplierFilter::IncludeExternal))
        .await
        .expect("query");

    assert!(rows.is_empty());
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let db = TestDb::with_rows(&mixed_catalogue()).await;
    let pool = db.pool();

    let text = SearchText::parse(Some("SMIRN")).expect("text");
    let rows = ListingRepo::search(&pool, text, PageRequest::default())
        .await
        .expect("query");

    assert_eq!(titles(&rows), vec!["Smirnoff Red"]);
}

#[tokio::test]
async fn search_respects_supplier_flag() {
    let db = TestDb::with_rows(&mixed_catalogue()).await;
    let pool = db.pool();

    let text = SearchText::parse(Some("vodka")).expect("text");
    let hidden = ListingRepo::search(&pool, text.clone(), PageRequest::default())
        .await
        .expect("query");
    let shown = ListingRepo::search(&pool, text, page(0, SupplierFilter::IncludeExternal))
        .await
        .expect("query");

    assert!(hidden.is_empty());
    assert_eq!(titles(&shown), vec!["Imported Vodka"]);
}

#[tokio::test]
async fn search_wildcards_match_literally() {
    let db = TestDb::with_rows(&[
        seed("100% Agave", "spirits", Some(1.0), None),
        seed("1000 Agave", "spirits", Some(2.0), None),
    ])
    .await;
    let pool = db.pool();

    let text = SearchText::parse(Some("100%")).expect("text");
    let rows = ListingRepo::search(&pool, text, PageRequest::default())
        .await
        .expect("query");

    assert_eq!(titles(&rows), vec!["100% Agave"]);
}

// ---------------------------------------------------------------------------
// Row shape + count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rows_carry_every_column_with_native_json_types() {
    let db = TestDb::with_rows(&[seed("Smirnoff", "spirits", Some(1.2), None)]).await;
    let pool = db.pool();

    let rows = ListingRepo::top(&pool, PageRequest::default()).await.expect("query");
    let json = serde_json::to_value(&rows[0]).expect("serialize");

    assert_eq!(json["producttitle"], "Smirnoff");
    assert_eq!(json["Type"], "spirits");
    assert_eq!(json["SinglePricePerStandard"], 1.2);
    assert!(json["CasePricePerStandard"].is_null());
    assert_eq!(json["DirectFromSupplier"], 0);
    assert_eq!(json["Stockcode"], "DM_0");
    assert_eq!(json["index"], 0);
}

#[tokio::test]
async fn count_reports_every_row() {
    let db = TestDb::with_rows(&mixed_catalogue()).await;
    let pool = db.pool();

    assert_eq!(ListingRepo::count(&pool).await.expect("count"), 6);
}

#[tokio::test]
async fn missing_table_is_a_query_error() {
    let db = TestDb::empty().await;
    let pool = db.pool();

    let err = ListingRepo::top(&pool, PageRequest::default())
        .await
        .expect_err("no table");
    assert!(err.to_string().contains("no such table"), "{err}");
}

#[tokio::test]
async fn health_check_passes_on_readable_file() {
    let db = TestDb::empty().await;
    pricesorter_db::health_check(&db.pool())
        .await
        .expect("health check");
}

#[tokio::test]
async fn table_exists_tracks_updater_output() {
    let empty = TestDb::empty().await;
    let seeded = TestDb::with_rows(&mixed_catalogue()).await;

    assert!(!ListingRepo::table_exists(&empty.pool()).await.expect("lookup"));
    assert!(ListingRepo::table_exists(&seeded.pool()).await.expect("lookup"));
}
