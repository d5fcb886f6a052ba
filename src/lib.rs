// Town Square - Local Business Directory Core Library
// Exposes the directory store for the terminal UI, command modes, and tests

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod recommend;
pub mod reports;
pub mod repository;
pub mod reviews;
pub mod validation;
pub mod verification;

// Re-export commonly used types
pub use config::Config;
pub use db::{Database, STARTER_BUSINESSES};
pub use entities::{Business, Category, ParseCategoryError, Review, ALL_CATEGORIES};
pub use error::{Error, Result};
pub use recommend::explain;
pub use reports::{ReportSummary, TOP_BUSINESS_LIMIT};
pub use repository::{BusinessQuery, SortOrder};
pub use reviews::current_timestamp;
pub use validation::{
    validate_business_name, validate_category, validate_deal_text, validate_rating,
    validate_review_text, ValidationError,
};
pub use verification::{Operation, VerificationChallenge};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
