//! Parameterized SELECT statements against the listings table.
//!
//! The table and its columns are created by the external updater, so the
//! names here must track what it writes. Statements are plain values (SQL
//! text plus ordered bind parameters); executing them is the `db` crate's
//! job.

use crate::category::Category;
use crate::error::CoreError;
use crate::paging::{PageRequest, PAGE_SIZE};

// ---------------------------------------------------------------------------
// Schema names
// ---------------------------------------------------------------------------

/// Table holding one row per purchasable listing.
pub const LISTING_TABLE: &str = "DanDB";

pub const COL_TITLE: &str = "producttitle";
pub const COL_CATEGORY: &str = "Type";
pub const COL_DIRECT_FROM_SUPPLIER: &str = "DirectFromSupplier";
pub const COL_SINGLE_PRICE_PER_STANDARD: &str = "SinglePricePerStandard";
pub const COL_CASE_PRICE_PER_STANDARD: &str = "CasePricePerStandard";

/// Escape character used in the search `LIKE` pattern.
const LIKE_ESCAPE: char = '\\';

// ---------------------------------------------------------------------------
// Statement
// ---------------------------------------------------------------------------

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Integer(i64),
}

/// SQL text with its positional parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<BindValue>,
}

// ---------------------------------------------------------------------------
// Search text
// ---------------------------------------------------------------------------

/// Non-empty free text matched against listing titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchText(String);

impl SearchText {
    /// Accept the decoded `query` parameter; missing or empty is rejected.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw {
            Some(text) if !text.is_empty() => Ok(Self(text.to_string())),
            _ => Err(CoreError::MissingSearchQuery),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `%text%` with LIKE wildcards escaped so the text matches literally.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
                pattern.push(LIKE_ESCAPE);
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

// ---------------------------------------------------------------------------
// Query shapes
// ---------------------------------------------------------------------------

/// One page of listings, cheapest price-per-standard first.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingQuery {
    /// Listings in a single category.
    Category { category: Category, page: PageRequest },
    /// Listings across every category.
    Top { page: PageRequest },
    /// Listings whose title contains the search text (ASCII case-insensitive).
    Search { text: SearchText, page: PageRequest },
}

impl ListingQuery {
    pub fn page(&self) -> &PageRequest {
        match self {
            ListingQuery::Category { page, .. }
            | ListingQuery::Top { page }
            | ListingQuery::Search { page, .. } => page,
        }
    }

    /// Build the statement for this query.
    ///
    /// Ordering falls back from the single-unit to the case price, then to
    /// `rowid` so paging is stable when sort keys tie.
    pub fn statement(&self) -> Statement {
        let mut filters = Vec::with_capacity(2);
        let mut params = Vec::with_capacity(3);

        match self {
            ListingQuery::Category { category, .. } => {
                filters.push(format!("{COL_CATEGORY} = ?"));
                params.push(BindValue::Text(category.as_str().to_string()));
            }
            ListingQuery::Top { .. } => {}
            ListingQuery::Search { text, .. } => {
                filters.push(format!("{COL_TITLE} LIKE ? ESCAPE '{LIKE_ESCAPE}'"));
                params.push(BindValue::Text(text.like_pattern()));
            }
        }

        let page = self.page();
        filters.push(format!("{COL_DIRECT_FROM_SUPPLIER} <= ?"));
        params.push(BindValue::Integer(page.supplier.max_flag()));

        let sql = format!(
            "SELECT * FROM {LISTING_TABLE} \
             WHERE {filters} \
             ORDER BY IFNULL({COL_SINGLE_PRICE_PER_STANDARD}, {COL_CASE_PRICE_PER_STANDARD}) ASC, rowid ASC \
             LIMIT {PAGE_SIZE} OFFSET ?",
            filters = filters.join(" AND "),
        );
        params.push(BindValue::Integer(page.offset()));

        Statement { sql, params }
    }
}

/// Statement counting every listing in the table.
pub fn count_statement() -> Statement {
    Statement {
        sql: format!("SELECT COUNT(*) FROM {LISTING_TABLE}"),
        params: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
