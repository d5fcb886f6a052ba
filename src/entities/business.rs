// 🏪 Business - one directory entry and its promotional deal

use super::Category;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// Columns selected by every business query, in `from_row` order
pub(crate) const BUSINESS_COLUMNS: &str =
    "id, name, category, deal_text, average_rating, review_count, is_favorite";

/// A directory entry.
///
/// `average_rating` and `review_count` are derived from the business's reviews
/// and are only ever rewritten by a full recompute when a review is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    /// Store-assigned identity, never reused
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub deal_text: String,
    /// Mean of all review ratings, 0.0 with no reviews
    pub average_rating: f64,
    pub review_count: i64,
    pub is_favorite: bool,
}

impl Business {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Business {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            deal_text: row.get(3)?,
            average_rating: row.get(4)?,
            review_count: row.get(5)?,
            is_favorite: row.get(6)?,
        })
    }

    pub fn has_reviews(&self) -> bool {
        self.review_count > 0
    }

    /// "4.5 (2)" style summary, or a placeholder for unrated businesses
    pub fn rating_display(&self) -> String {
        if self.has_reviews() {
            format!("{:.1} ({})", self.average_rating, self.review_count)
        } else {
            "No reviews yet".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(average_rating: f64, review_count: i64) -> Business {
        Business {
            id: 1,
            name: "Sunrise Café".to_string(),
            category: Category::Food,
            deal_text: "Buy 1 breakfast, get 2nd 50% off".to_string(),
            average_rating,
            review_count,
            is_favorite: false,
        }
    }

    #[test]
    fn test_rating_display() {
        assert_eq!(sample(0.0, 0).rating_display(), "No reviews yet");
        assert_eq!(sample(4.5, 2).rating_display(), "4.5 (2)");
        assert_eq!(sample(3.666_666, 3).rating_display(), "3.7 (3)");
    }

    #[test]
    fn test_business_serializes_category_by_name() {
        let json = serde_json::to_value(sample(4.0, 1)).unwrap();
        assert_eq!(json["category"], "Food");
        assert_eq!(json["is_favorite"], false);
    }
}
