// 🏷️ Category - the fixed set of directory sections
//
// Stored as its display name in the `category` TEXT column.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sentinel used by list and recommendation screens for "no category filter"
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Retail,
    Services,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category '{0}' (expected Food, Retail, or Services)")]
pub struct ParseCategoryError(pub String);

impl Category {
    pub const ALL: [Category; 3] = [Category::Food, Category::Retail, Category::Services];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Retail => "Retail",
            Category::Services => "Services",
        }
    }

    /// Parse a filter value where empty input or the "All" sentinel means no filter
    pub fn parse_filter(value: &str) -> Result<Option<Category>, ParseCategoryError> {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES {
            return Ok(None);
        }
        value.parse().map(Some)
    }

    /// Next filter in the All -> Food -> Retail -> Services -> All cycle
    pub fn cycle_filter(current: Option<Category>) -> Option<Category> {
        match current {
            None => Some(Category::Food),
            Some(Category::Food) => Some(Category::Retail),
            Some(Category::Retail) => Some(Category::Services),
            Some(Category::Services) => None,
        }
    }

    pub fn filter_label(filter: Option<Category>) -> &'static str {
        filter.map(|c| c.as_str()).unwrap_or(ALL_CATEGORIES)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad so column widths in tables apply
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Exact, case-sensitive match on the display name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: ParseCategoryError| FromSqlError::Other(Box::new(e)))
    }
}
