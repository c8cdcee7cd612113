//! Product category allow-list.
//!
//! The external updater scrapes exactly these departments, so the category
//! endpoint refuses anything else before touching the database.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A product department as stored in the `Type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Spirits,
    WhiteWine,
    ChampagneSparkling,
    Whisky,
    RedWine,
    Beer,
    Cider,
}

impl Category {
    /// Every accepted category, in the order the updater scrapes them.
    pub const ALL: [Category; 7] = [
        Category::Spirits,
        Category::WhiteWine,
        Category::ChampagneSparkling,
        Category::Whisky,
        Category::RedWine,
        Category::Beer,
        Category::Cider,
    ];

    /// The exact value stored in the `Type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Spirits => "spirits",
            Category::WhiteWine => "white wine",
            Category::ChampagneSparkling => "champagne-sparkling",
            Category::Whisky => "whisky",
            Category::RedWine => "red wine",
            Category::Beer => "beer",
            Category::Cider => "cider",
        }
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Exact, case-sensitive match against the allow-list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
