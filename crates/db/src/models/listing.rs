//! A single product listing row.

use pricesorter_core::listing_query::{
    COL_CASE_PRICE_PER_STANDARD, COL_CATEGORY, COL_DIRECT_FROM_SUPPLIER,
    COL_SINGLE_PRICE_PER_STANDARD, COL_TITLE,
};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use sqlx::sqlite::{SqliteRow, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Column, Decode, FromRow, Row, Sqlite, TypeInfo, ValueRef};

/// One listing, serialized as a column-name to value object in table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Listing(Map<String, Value>);

impl Listing {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn columns(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn title(&self) -> Option<&str> {
        self.get(COL_TITLE).and_then(Value::as_str)
    }

    pub fn category(&self) -> Option<&str> {
        self.get(COL_CATEGORY).and_then(Value::as_str)
    }

    /// `DirectFromSupplier` as stored (0 primary, 1 external).
    pub fn supplier_flag(&self) -> Option<i64> {
        self.get(COL_DIRECT_FROM_SUPPLIER).and_then(Value::as_i64)
    }

    /// Single-unit price-per-standard, falling back to the case price.
    pub fn sort_key(&self) -> Option<f64> {
        self.get(COL_SINGLE_PRICE_PER_STANDARD)
            .and_then(Value::as_f64)
            .or_else(|| self.get(COL_CASE_PRICE_PER_STANDARD).and_then(Value::as_f64))
    }
}

impl From<Map<String, Value>> for Listing {
    fn from(columns: Map<String, Value>) -> Self {
        Self(columns)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Listing {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let mut columns = Map::new();
        for column in row.columns() {
            let value = decode_column(row, column.ordinal())?;
            columns.insert(column.name().to_string(), value);
        }
        Ok(Self(columns))
    }
}

// ---------------------------------------------------------------------------
// Dynamic column decoding
// ---------------------------------------------------------------------------

/// JSON shape chosen for a stored value.
enum ColumnKind {
    Integer,
    Real,
    Blob,
    Text,
}

impl ColumnKind {
    fn of(info: &SqliteTypeInfo) -> Self {
        match info.name() {
            "INTEGER" | "BOOLEAN" => ColumnKind::Integer,
            "REAL" | "NUMERIC" => ColumnKind::Real,
            "BLOB" => ColumnKind::Blob,
            _ => ColumnKind::Text,
        }
    }
}

fn decode_column(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let kind = ColumnKind::of(&raw.type_info());
    let value = match kind {
        ColumnKind::Integer => Value::from(decode::<i64>(raw, index)?),
        // NaN and infinities have no JSON form.
        ColumnKind::Real => Number::from_f64(decode::<f64>(raw, index)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ColumnKind::Blob => Value::Null,
        ColumnKind::Text => Value::String(decode::<String>(raw, index)?),
    };
    Ok(value)
}

fn decode<'r, T>(raw: SqliteValueRef<'r>, index: usize) -> Result<T, sqlx::Error>
where
    T: Decode<'r, Sqlite>,
{
    T::decode(raw).map_err(|source| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source,
    })
}
