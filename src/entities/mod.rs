// Record types returned by the directory core
//
// All of these are transient copies; the database owns the persisted rows.

pub mod business;
pub mod category;
pub mod review;

pub use business::Business;
pub use category::{Category, ParseCategoryError, ALL_CATEGORIES};
pub use review::Review;
