// ✅ Input validation - the rules a caller applies before touching the store
//
// Each error's Display text is the message shown to the user.
// Lengths are measured in characters after trimming.

use crate::entities::Category;
use thiserror::Error;

pub const MIN_REVIEW_LENGTH: usize = 10;
pub const MAX_REVIEW_LENGTH: usize = 500;
pub const MIN_BUSINESS_NAME_LENGTH: usize = 3;
pub const MAX_BUSINESS_NAME_LENGTH: usize = 80;
pub const MIN_DEAL_LENGTH: usize = 5;
pub const MAX_DEAL_LENGTH: usize = 200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a rating from 1 to 5.")]
    MissingRating,

    #[error("Rating must be a whole number between 1 and 5.")]
    RatingNotNumber,

    #[error("Rating must be between 1 (lowest) and 5 (highest).")]
    RatingOutOfRange,

    #[error("Review is too short. Please use at least {} characters.", MIN_REVIEW_LENGTH)]
    ReviewTooShort,

    #[error("Review is quite long. Please stay under {} characters.", MAX_REVIEW_LENGTH)]
    ReviewTooLong,

    #[error("Business name is too short. Please use a descriptive name.")]
    NameTooShort,

    #[error("Business name is quite long. Please stay under {} characters.", MAX_BUSINESS_NAME_LENGTH)]
    NameTooLong,

    #[error("Please describe the special deal or coupon (a few words are enough).")]
    DealTooShort,

    #[error("Deal text is quite long. Please stay under {} characters.", MAX_DEAL_LENGTH)]
    DealTooLong,

    #[error("Please choose a valid category: Food, Retail, or Services.")]
    UnknownCategory,
}

/// Trimmed text whose character count lies in `min..=max`
fn bounded<'a>(
    text: &'a str,
    min: usize,
    max: usize,
    too_short: ValidationError,
    too_long: ValidationError,
) -> Result<&'a str, ValidationError> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len < min {
        Err(too_short)
    } else if len > max {
        Err(too_long)
    } else {
        Ok(trimmed)
    }
}

/// Digits only, 1 through 5
pub fn validate_rating(value: &str) -> Result<u8, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingRating);
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::RatingNotNumber);
    }

    // Overlong digit strings fail to parse and are simply out of range
    match value.parse::<u8>() {
        Ok(rating @ 1..=5) => Ok(rating),
        _ => Err(ValidationError::RatingOutOfRange),
    }
}

pub fn validate_review_text(text: &str) -> Result<&str, ValidationError> {
    bounded(
        text,
        MIN_REVIEW_LENGTH,
        MAX_REVIEW_LENGTH,
        ValidationError::ReviewTooShort,
        ValidationError::ReviewTooLong,
    )
}

pub fn validate_business_name(name: &str) -> Result<&str, ValidationError> {
    bounded(
        name,
        MIN_BUSINESS_NAME_LENGTH,
        MAX_BUSINESS_NAME_LENGTH,
        ValidationError::NameTooShort,
        ValidationError::NameTooLong,
    )
}

pub fn validate_deal_text(deal: &str) -> Result<&str, ValidationError> {
    bounded(
        deal,
        MIN_DEAL_LENGTH,
        MAX_DEAL_LENGTH,
        ValidationError::DealTooShort,
        ValidationError::DealTooLong,
    )
}

/// Exactly one of the category display names
pub fn validate_category(value: &str) -> Result<Category, ValidationError> {
    value.parse().map_err(|_| ValidationError::UnknownCategory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_accepts_one_to_five() {
        for (input, expected) in [("1", 1), ("5", 5), (" 3 ", 3), ("04", 4)] {
            assert_eq!(validate_rating(input), Ok(expected), "input {:?}", input);
        }
    }

    #[test]
    fn test_rating_rejections() {
        assert_eq!(validate_rating(""), Err(ValidationError::MissingRating));
        assert_eq!(validate_rating("   "), Err(ValidationError::MissingRating));
        assert_eq!(validate_rating("four"), Err(ValidationError::RatingNotNumber));
        assert_eq!(validate_rating("-3"), Err(ValidationError::RatingNotNumber));
        assert_eq!(validate_rating("4.5"), Err(ValidationError::RatingNotNumber));
        assert_eq!(validate_rating("0"), Err(ValidationError::RatingOutOfRange));
        assert_eq!(validate_rating("6"), Err(ValidationError::RatingOutOfRange));
        assert_eq!(
            validate_rating("99999999999999999999"),
            Err(ValidationError::RatingOutOfRange)
        );
    }

    #[test]
    fn test_review_text_bounds() {
        assert_eq!(validate_review_text("  too short "), Err(ValidationError::ReviewTooShort));
        assert_eq!(validate_review_text("  Just right!  "), Ok("Just right!"));
        assert_eq!(validate_review_text(&"a".repeat(10)).unwrap().len(), 10);
        assert!(validate_review_text(&"a".repeat(500)).is_ok());
        assert_eq!(
            validate_review_text(&"a".repeat(501)),
            Err(ValidationError::ReviewTooLong)
        );
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        // 10 characters, 20 bytes
        let text = "éééééééééé";
        assert_eq!(text.len(), 20);
        assert!(validate_review_text(text).is_ok());
        assert!(validate_business_name(&"é".repeat(80)).is_ok());
    }

    #[test]
    fn test_business_name_bounds() {
        assert_eq!(validate_business_name(" ab "), Err(ValidationError::NameTooShort));
        assert_eq!(validate_business_name("Abc"), Ok("Abc"));
        assert_eq!(
            validate_business_name(&"n".repeat(81)),
            Err(ValidationError::NameTooLong)
        );
    }

    #[test]
    fn test_deal_text_bounds() {
        assert_eq!(validate_deal_text("Free"), Err(ValidationError::DealTooShort));
        assert_eq!(validate_deal_text(" Free! "), Ok("Free!"));
        assert_eq!(
            validate_deal_text(&"d".repeat(201)),
            Err(ValidationError::DealTooLong)
        );
    }

    #[test]
    fn test_category_must_match_exactly() {
        assert_eq!(validate_category("Services"), Ok(Category::Services));
        assert_eq!(validate_category("services"), Err(ValidationError::UnknownCategory));
        assert_eq!(validate_category("All"), Err(ValidationError::UnknownCategory));
    }

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(
            ValidationError::ReviewTooShort.to_string(),
            "Review is too short. Please use at least 10 characters."
        );
        assert_eq!(
            ValidationError::DealTooLong.to_string(),
            "Deal text is quite long. Please stay under 200 characters."
        );
    }
}
