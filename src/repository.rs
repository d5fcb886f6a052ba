// 📇 Business Repository - add, list, look up, and favorite businesses

use crate::db::Database;
use crate::entities::business::BUSINESS_COLUMNS;
use crate::entities::{Business, Category};
use crate::error::Result;
use rusqlite::{params, OptionalExtension, ToSql};
use tracing::{debug, warn};

/// Ordering applied by `list_businesses`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Alphabetical by name
    #[default]
    Name,
    /// Highest average first, then most reviewed, then alphabetical
    RatingDesc,
}

impl SortOrder {
    pub(crate) fn order_by(&self) -> &'static str {
        match self {
            SortOrder::Name => " ORDER BY name ASC, id ASC",
            SortOrder::RatingDesc => {
                " ORDER BY average_rating DESC, review_count DESC, name ASC, id ASC"
            }
        }
    }
}

/// Filters for `list_businesses`. The default lists everything by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BusinessQuery {
    /// `None` means every category
    pub category: Option<Category>,
    pub sort: SortOrder,
    pub favorites_only: bool,
}

impl BusinessQuery {
    pub fn category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn favorites_only(mut self, favorites_only: bool) -> Self {
        self.favorites_only = favorites_only;
        self
    }
}

impl Database {
    /// Insert a new business with empty rating state and return the stored row.
    ///
    /// Surrounding whitespace is trimmed; content validation is the caller's job.
    pub fn add_business(&self, name: &str, category: Category, deal_text: &str) -> Result<Business> {
        let business = self.write(|tx| {
            tx.execute(
                "INSERT INTO businesses (name, category, deal_text) VALUES (?1, ?2, ?3)",
                params![name.trim(), category, deal_text.trim()],
            )?;
            let id = tx.last_insert_rowid();

            Ok(tx.query_row(
                &format!("SELECT {} FROM businesses WHERE id = ?1", BUSINESS_COLUMNS),
                [id],
                Business::from_row,
            )?)
        })?;

        debug!(id = business.id, name = %business.name, "added business");
        Ok(business)
    }

    /// Businesses matching `query`. Never errors on an empty match.
    pub fn list_businesses(&self, query: &BusinessQuery) -> Result<Vec<Business>> {
        let mut sql = format!("SELECT {} FROM businesses", BUSINESS_COLUMNS);
        let mut clauses = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();

        if let Some(category) = &query.category {
            clauses.push("category = ?");
            values.push(category);
        }
        if query.favorites_only {
            clauses.push("is_favorite = 1");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(query.sort.order_by());

        self.read(|tx| {
            let mut stmt = tx.prepare(&sql)?;
            let businesses = stmt
                .query_map(values.as_slice(), Business::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(businesses)
        })
    }

    /// Look up one business by id
    pub fn get_business(&self, id: i64) -> Result<Option<Business>> {
        self.read(|tx| {
            Ok(tx
                .query_row(
                    &format!("SELECT {} FROM businesses WHERE id = ?1", BUSINESS_COLUMNS),
                    [id],
                    Business::from_row,
                )
                .optional()?)
        })
    }

    /// Set the favorite flag. A missing id is a no-op; returns whether a row changed.
    pub fn toggle_favorite(&self, business_id: i64, make_favorite: bool) -> Result<bool> {
        let updated = self.write(|tx| {
            Ok(tx.execute(
                "UPDATE businesses SET is_favorite = ?1 WHERE id = ?2",
                params![make_favorite, business_id],
            )?)
        })?;

        if updated == 0 {
            warn!(business_id, "favorite toggle ignored for missing business");
        }
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{empty_database, seeded_database};

    fn names(businesses: &[Business]) -> Vec<&str> {
        businesses.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_add_business_trims_and_starts_empty() {
        let (_dir, db) = empty_database();

        let business = db
            .add_business("  Harbor Bakery \n", Category::Food, "\tFree cookie with coffee  ")
            .unwrap();

        assert!(business.id > 0);
        assert_eq!(business.name, "Harbor Bakery");
        assert_eq!(business.deal_text, "Free cookie with coffee");
        assert_eq!(business.category, Category::Food);
        assert_eq!(business.average_rating, 0.0);
        assert_eq!(business.review_count, 0);
        assert!(!business.is_favorite);

        assert_eq!(db.get_business(business.id).unwrap(), Some(business));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let (_dir, db) = empty_database();
        let first = db.add_business("First Shop", Category::Retail, "Deal one").unwrap();
        db.write(|tx| {
            tx.execute("DELETE FROM businesses WHERE id = ?1", [first.id])?;
            Ok(())
        })
        .unwrap();

        let second = db.add_business("Second Shop", Category::Retail, "Deal two").unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_list_by_name_is_default() {
        let (_dir, db) = seeded_database();

        let all = db.list_businesses(&BusinessQuery::default()).unwrap();
        assert_eq!(
            names(&all),
            vec![
                "Corner Book Nook",
                "Green Leaf Market",
                "Sparkle Cleaners",
                "Sunrise Café",
                "TechFix Repair",
                "Tiny Treasures Gifts",
            ]
        );
    }

    #[test]
    fn test_list_category_filter() {
        let (_dir, db) = seeded_database();

        let food = db
            .list_businesses(&BusinessQuery::default().category(Some(Category::Food)))
            .unwrap();
        assert_eq!(names(&food), vec!["Green Leaf Market", "Sunrise Café"]);
        assert!(food.iter().all(|b| b.category == Category::Food));
    }

    #[test]
    fn test_list_favorites_only() {
        let (_dir, db) = seeded_database();
        let all = db.list_businesses(&BusinessQuery::default()).unwrap();

        assert!(db
            .list_businesses(&BusinessQuery::default().favorites_only(true))
            .unwrap()
            .is_empty());

        let tech = all.iter().find(|b| b.name == "TechFix Repair").unwrap();
        db.toggle_favorite(tech.id, true).unwrap();

        let favorites = db
            .list_businesses(&BusinessQuery::default().favorites_only(true))
            .unwrap();
        assert_eq!(names(&favorites), vec!["TechFix Repair"]);

        let food_favorites = db
            .list_businesses(
                &BusinessQuery::default()
                    .category(Some(Category::Food))
                    .favorites_only(true),
            )
            .unwrap();
        assert!(food_favorites.is_empty());
    }

    #[test]
    fn test_list_on_empty_store_is_empty() {
        let (_dir, db) = empty_database();
        let query = BusinessQuery::default().sort(SortOrder::RatingDesc);
        assert!(db.list_businesses(&query).unwrap().is_empty());
    }

    #[test]
    fn test_rating_sort_order_law() {
        let (_dir, db) = empty_database();
        let a = db.add_business("Alpha Diner", Category::Food, "Free soup").unwrap();
        let b = db.add_business("Bravo Books", Category::Retail, "Free bookmark").unwrap();
        let c = db.add_business("Charlie Cuts", Category::Services, "Half-price trim").unwrap();
        let d = db.add_business("Delta Deli", Category::Food, "Free pickle").unwrap();
        let _e = db.add_business("Echo Electric", Category::Services, "Free quote").unwrap();

        // a: 4.0 from 2, b: 4.0 from 1, c: 5.0 from 1, d: 4.0 from 2, e: none
        for (id, rating) in [(a.id, 3), (a.id, 5), (b.id, 4), (c.id, 5), (d.id, 4), (d.id, 4)] {
            db.add_review(id, rating, "Solid local business", "2024-03-01T12:00:00")
                .unwrap();
        }

        let sorted = db
            .list_businesses(&BusinessQuery::default().sort(SortOrder::RatingDesc))
            .unwrap();

        assert_eq!(
            names(&sorted),
            vec!["Charlie Cuts", "Alpha Diner", "Delta Deli", "Bravo Books", "Echo Electric"]
        );

        for pair in sorted.windows(2) {
            let (x, y) = (&pair[0], &pair[1]);
            let key_x = (x.average_rating, x.review_count);
            let key_y = (y.average_rating, y.review_count);
            assert!(key_x >= key_y, "{} should not precede {}", x.name, y.name);
            if key_x == key_y {
                assert!(x.name <= y.name);
            }
        }
    }

    #[test]
    fn test_toggle_favorite_is_idempotent() {
        let (_dir, db) = seeded_database();
        let business = &db.list_businesses(&BusinessQuery::default()).unwrap()[0];

        assert!(db.toggle_favorite(business.id, true).unwrap());
        assert!(db.toggle_favorite(business.id, true).unwrap());
        assert!(db.get_business(business.id).unwrap().unwrap().is_favorite);

        db.toggle_favorite(business.id, false).unwrap();
        let after = db.get_business(business.id).unwrap().unwrap();
        assert!(!after.is_favorite);
        assert_eq!(after.average_rating, business.average_rating);
        assert_eq!(after.review_count, business.review_count);
    }

    #[test]
    fn test_toggle_missing_business_is_noop() {
        let (_dir, db) = seeded_database();
        let before = db.list_businesses(&BusinessQuery::default()).unwrap();

        assert!(!db.toggle_favorite(9_999, true).unwrap());

        assert_eq!(db.list_businesses(&BusinessQuery::default()).unwrap(), before);
    }

    #[test]
    fn test_get_missing_business() {
        let (_dir, db) = seeded_database();
        assert_eq!(db.get_business(9_999).unwrap(), None);
    }
}
