// ⭐ Review - an append-only rating and comment for one business

use rusqlite::Row;
use serde::{Deserialize, Serialize};

pub(crate) const REVIEW_COLUMNS: &str = "id, business_id, rating, text, created_at";

/// A single rating-and-comment submission.
///
/// Never updated once written; removed only when its business is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub business_id: i64,
    /// 1..=5, validated by the caller
    pub rating: u8,
    pub text: String,
    /// Local ISO-8601 timestamp with second precision
    pub created_at: String,
}

impl Review {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Review {
            id: row.get(0)?,
            business_id: row.get(1)?,
            rating: row.get(2)?,
            text: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    /// "★★★★☆" rendering of the rating
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.min(5));
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}
