// 📊 Report Aggregator - directory-wide summary statistics

use crate::db::Database;
use crate::entities::business::BUSINESS_COLUMNS;
use crate::entities::Business;
use crate::error::Result;
use crate::repository::SortOrder;
use serde::{Deserialize, Serialize};

/// How many businesses the report ranks
pub const TOP_BUSINESS_LIMIT: usize = 3;

/// Snapshot computed fresh on every request; never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_businesses: i64,
    /// Mean of per-business averages over businesses with at least one review
    pub average_rating: f64,
    /// Best rated reviewed businesses, rating-descending order
    pub top_businesses: Vec<Business>,
    pub favorite_count: i64,
}

impl Database {
    /// Compute all four summary values from one read snapshot
    pub fn get_summary(&self) -> Result<ReportSummary> {
        self.read(|tx| {
            let total_businesses: i64 =
                tx.query_row("SELECT COUNT(*) FROM businesses", [], |row| row.get(0))?;

            let average_rating: Option<f64> = tx.query_row(
                "SELECT AVG(average_rating) FROM businesses WHERE review_count > 0",
                [],
                |row| row.get(0),
            )?;

            let mut stmt = tx.prepare(&format!(
                "SELECT {} FROM businesses WHERE review_count > 0{} LIMIT ?1",
                BUSINESS_COLUMNS,
                SortOrder::RatingDesc.order_by()
            ))?;
            let top_businesses = stmt
                .query_map([TOP_BUSINESS_LIMIT as i64], Business::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let favorite_count: i64 = tx.query_row(
                "SELECT COUNT(*) FROM businesses WHERE is_favorite = 1",
                [],
                |row| row.get(0),
            )?;

            Ok(ReportSummary {
                total_businesses,
                average_rating: average_rating.unwrap_or(0.0),
                top_businesses,
                favorite_count,
            })
        })
    }
}
