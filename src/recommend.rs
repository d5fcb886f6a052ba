// 💡 Recommendation Ranker - explainable, rule-based suggestions
//
// Ranking keys, in priority order: favorited first, then highest average
// rating, then most reviews, then alphabetical by name.

use crate::db::Database;
use crate::entities::business::BUSINESS_COLUMNS;
use crate::entities::{Business, Category};
use crate::error::Result;
use rusqlite::{Connection, ToSql};
use tracing::debug;

const RANKING_ORDER: &str =
    " ORDER BY is_favorite DESC, average_rating DESC, review_count DESC, name ASC, id ASC";

fn ranked(conn: &Connection, category: Option<Category>) -> rusqlite::Result<Vec<Business>> {
    let mut sql = format!("SELECT {} FROM businesses", BUSINESS_COLUMNS);
    let mut values: Vec<&dyn ToSql> = Vec::new();
    if let Some(category) = &category {
        sql.push_str(" WHERE category = ?1");
        values.push(category);
    }
    sql.push_str(RANKING_ORDER);

    let mut stmt = conn.prepare(&sql)?;
    let businesses = stmt
        .query_map(values.as_slice(), Business::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(businesses)
}

impl Database {
    /// Rank businesses in `preferred` (or every category when `None`).
    ///
    /// A category with no businesses at all falls back to the ranking over the
    /// whole directory.
    pub fn recommend(&self, preferred: Option<Category>) -> Result<Vec<Business>> {
        self.read(|tx| {
            let results = ranked(tx, preferred)?;
            if !results.is_empty() || preferred.is_none() {
                return Ok(results);
            }

            debug!(category = ?preferred, "no businesses in category, ranking whole directory");
            Ok(ranked(tx, None)?)
        })
    }
}

/// One-line reason a business appears where it does in the ranking
pub fn explain(business: &Business) -> String {
    let rating = if business.has_reviews() {
        let noun = if business.review_count == 1 { "review" } else { "reviews" };
        format!(
            "rated {:.1} from {} {}",
            business.average_rating, business.review_count, noun
        )
    } else {
        "not rated yet".to_string()
    };

    if business.is_favorite {
        format!("Favorite, {}", rating)
    } else {
        let mut chars = rating.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{empty_database, seeded_database};
    use crate::repository::BusinessQuery;

    fn names(businesses: &[Business]) -> Vec<&str> {
        businesses.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_favorites_outrank_ratings() {
        let (_dir, db) = empty_database();
        let star = db.add_business("Star Grill", Category::Food, "Free fries").unwrap();
        let fav = db.add_business("Fav Noodles", Category::Food, "Free broth").unwrap();
        let plain = db.add_business("Plain Pizza", Category::Food, "Two for one").unwrap();

        db.add_review(star.id, 5, "Perfect burgers every time", "2024-01-01T12:00:00").unwrap();
        db.add_review(fav.id, 2, "Noodles were a bit soggy", "2024-01-01T12:00:00").unwrap();
        db.toggle_favorite(fav.id, true).unwrap();

        let ranked = db.recommend(Some(Category::Food)).unwrap();
        assert_eq!(names(&ranked), vec!["Fav Noodles", "Star Grill", "Plain Pizza"]);
        assert_eq!(ranked[2].id, plain.id);
    }

    #[test]
    fn test_review_count_then_name_break_ties() {
        let (_dir, db) = empty_database();
        let zeta = db.add_business("Zeta Tailor", Category::Services, "Free hem").unwrap();
        let alpha = db.add_business("Alpha Tailor", Category::Services, "Free button").unwrap();
        let busy = db.add_business("Busy Tailor", Category::Services, "Free press").unwrap();

        db.add_review(zeta.id, 4, "Neat stitching work", "2024-01-01T12:00:00").unwrap();
        db.add_review(alpha.id, 4, "Quick turnaround here", "2024-01-01T12:00:00").unwrap();
        db.add_review(busy.id, 4, "Great job on my coat", "2024-01-01T12:00:00").unwrap();
        db.add_review(busy.id, 4, "Fixed a zipper fast", "2024-01-02T12:00:00").unwrap();

        let ranked = db.recommend(None).unwrap();
        assert_eq!(names(&ranked), vec!["Busy Tailor", "Alpha Tailor", "Zeta Tailor"]);
    }

    #[test]
    fn test_category_filter_applies() {
        let (_dir, db) = seeded_database();
        let retail = db.recommend(Some(Category::Retail)).unwrap();
        assert_eq!(names(&retail), vec!["Corner Book Nook", "Tiny Treasures Gifts"]);
    }

    #[test]
    fn test_empty_category_falls_back_to_whole_directory() {
        let (_dir, db) = empty_database();
        db.add_business("Green Grocer", Category::Food, "Free apple").unwrap();
        let shop = db.add_business("Gadget Shop", Category::Retail, "Free case").unwrap();
        db.toggle_favorite(shop.id, true).unwrap();

        let fallback = db.recommend(Some(Category::Services)).unwrap();
        let everything = db.recommend(None).unwrap();

        assert_eq!(fallback, everything);
        assert_eq!(names(&fallback), vec!["Gadget Shop", "Green Grocer"]);
    }

    #[test]
    fn test_recommend_returns_every_business() {
        let (_dir, db) = seeded_database();
        let all = db.list_businesses(&BusinessQuery::default()).unwrap();
        assert_eq!(db.recommend(None).unwrap().len(), all.len());
    }

    #[test]
    fn test_recommend_on_empty_store() {
        let (_dir, db) = empty_database();
        assert!(db.recommend(Some(Category::Food)).unwrap().is_empty());
    }

    #[test]
    fn test_explain() {
        let mut business = Business {
            id: 1,
            name: "Sunrise Café".to_string(),
            category: Category::Food,
            deal_text: "Buy 1 breakfast, get 2nd 50% off".to_string(),
            average_rating: 4.5,
            review_count: 2,
            is_favorite: true,
        };
        assert_eq!(explain(&business), "Favorite, rated 4.5 from 2 reviews");

        business.is_favorite = false;
        business.review_count = 1;
        business.average_rating = 3.0;
        assert_eq!(explain(&business), "Rated 3.0 from 1 review");

        business.review_count = 0;
        business.average_rating = 0.0;
        assert_eq!(explain(&business), "Not rated yet");
    }
}
