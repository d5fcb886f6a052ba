// ⭐ Review Ledger - append reviews and recompute business aggregates

use crate::db::Database;
use crate::entities::review::REVIEW_COLUMNS;
use crate::entities::Review;
use crate::error::{Error, Result};
use chrono::Local;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

/// Local time as ISO-8601 with second precision, e.g. `2024-05-01T09:30:00`
pub fn current_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

impl Database {
    /// Append a review and recompute the owning business's rating statistics.
    ///
    /// The existence check, insert, and recompute share one transaction, so no
    /// reader sees a review without the matching aggregate. Rating range and
    /// text length are the caller's responsibility.
    pub fn add_review(
        &self,
        business_id: i64,
        rating: u8,
        text: &str,
        created_at: &str,
    ) -> Result<Review> {
        let review = self.write(|tx| {
            let exists = tx
                .query_row("SELECT 1 FROM businesses WHERE id = ?1", [business_id], |_| Ok(()))
                .optional()?
                .is_some();
            if !exists {
                return Err(Error::Reference(business_id));
            }

            tx.execute(
                "INSERT INTO reviews (business_id, rating, text, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![business_id, rating, text, created_at],
            )?;
            let review = Review {
                id: tx.last_insert_rowid(),
                business_id,
                rating,
                text: text.to_string(),
                created_at: created_at.to_string(),
            };

            // Full recompute, never an incremental patch
            let (average, count): (Option<f64>, i64) = tx.query_row(
                "SELECT AVG(rating), COUNT(*) FROM reviews WHERE business_id = ?1",
                [business_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            tx.execute(
                "UPDATE businesses SET average_rating = ?1, review_count = ?2 WHERE id = ?3",
                params![average.unwrap_or(0.0), count, business_id],
            )?;

            Ok(review)
        })?;

        debug!(business_id, review_id = review.id, rating, "added review");
        Ok(review)
    }

    /// Reviews for one business, newest first. Empty for unknown ids.
    pub fn reviews_for(&self, business_id: i64) -> Result<Vec<Review>> {
        self.read(|tx| {
            let mut stmt = tx.prepare(&format!(
                "SELECT {} FROM reviews WHERE business_id = ?1
                 ORDER BY created_at DESC, id DESC",
                REVIEW_COLUMNS
            ))?;
            let reviews = stmt
                .query_map([business_id], Review::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(reviews)
        })
    }
}
