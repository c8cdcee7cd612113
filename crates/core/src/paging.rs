//! Pagination and supplier-filter normalization.
//!
//! Query parameters on the listing endpoints are never an error source:
//! anything that does not parse cleanly falls back to the conservative
//! default (first page, primary supplier only).

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of listings returned per page.
pub const PAGE_SIZE: i64 = 15;

// ---------------------------------------------------------------------------
// Supplier filter
// ---------------------------------------------------------------------------

/// Which suppliers a listing query may return.
///
/// Stored as the upper bound compared against `DirectFromSupplier`, so
/// `PrimaryOnly` (0) drops external listings and `IncludeExternal` (1)
/// keeps everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SupplierFilter {
    #[default]
    PrimaryOnly,
    IncludeExternal,
}

impl SupplierFilter {
    /// Parse the `externSupplier` query value. Only `0` and `1` are honoured.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.and_then(parse_int) {
            Some(1) => SupplierFilter::IncludeExternal,
            _ => SupplierFilter::PrimaryOnly,
        }
    }

    /// Value bound against `DirectFromSupplier <= ?`.
    pub fn max_flag(self) -> i64 {
        match self {
            SupplierFilter::PrimaryOnly => 0,
            SupplierFilter::IncludeExternal => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Page request
// ---------------------------------------------------------------------------

/// Normalized paging and filtering inputs shared by all listing endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page number, never negative.
    pub page: i64,
    pub supplier: SupplierFilter,
}

impl PageRequest {
    /// Build from the raw `page` and `externSupplier` query values.
    pub fn from_params(page: Option<&str>, extern_supplier: Option<&str>) -> Self {
        Self {
            page: parse_page(page),
            supplier: SupplierFilter::from_param(extern_supplier),
        }
    }

    /// Row offset for this page. Saturates instead of overflowing.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(PAGE_SIZE)
    }
}

/// Parse the `page` query value, defaulting to 0 on junk or negatives.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(parse_int).unwrap_or(0).max(0)
}

/// Read the leading integer of `raw`: optional whitespace, an optional sign,
/// then decimal digits. Anything after the digits is ignored, so `2abc` is 2
/// and `1.5` is 1. `None` when no digits lead the value. Out-of-range values
/// saturate.
fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
