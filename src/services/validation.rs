use regex::Regex;

use crate::errors::{DirectoryError, DirectoryResult};

/// Longest comment accepted on a dish review
pub const MAX_DISH_COMMENT_LEN: usize = 100;

/// Service for input validation and normalisation at the request boundary
pub struct ValidationService;

impl ValidationService {
    /// Trim a required text field, rejecting blank values
    pub fn validate_text(field: &str, value: &str) -> DirectoryResult<String> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DirectoryError::validation(field, "cannot be empty"));
        }

        Ok(trimmed.to_string())
    }

    pub fn validate_email(email: &str) -> DirectoryResult<String> {
        let trimmed = Self::validate_text("email", email)?;

        let regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .map_err(|e| DirectoryError::validation("email", format!("regex failed: {}", e)))?;
        if !regex.is_match(&trimmed) {
            return Err(DirectoryError::validation("email", "is not a valid address"));
        }

        Ok(trimmed)
    }

    pub fn validate_url(url: &str) -> DirectoryResult<String> {
        let trimmed = Self::validate_text("website", url)?;

        let regex = Regex::new(r"^https?://[^\s/$.?#][^\s]*$")
            .map_err(|e| DirectoryError::validation("website", format!("regex failed: {}", e)))?;
        if !regex.is_match(&trimmed) {
            return Err(DirectoryError::validation(
                "website",
                "must be an http or https URL",
            ));
        }

        Ok(trimmed)
    }

    /// Entity ids are positive integers
    pub fn validate_id(field: &str, id: i32) -> DirectoryResult<i32> {
        if id < 1 {
            return Err(DirectoryError::validation(field, "must be a positive id"));
        }
        Ok(id)
    }

    /// Report thresholds are finite numbers greater than zero
    pub fn validate_positive_score(field: &str, score: f64) -> DirectoryResult<f64> {
        if !score.is_finite() || score <= 0.0 {
            return Err(DirectoryError::validation(field, "must be a positive number"));
        }
        Ok(score)
    }

    /// Review and dish review scores are integers in [1, 5]
    pub fn validate_rating(field: &str, score: i32) -> DirectoryResult<i32> {
        if !(1..=5).contains(&score) {
            return Err(DirectoryError::validation(field, "must be between 1 and 5"));
        }
        Ok(score)
    }

    /// Restaurant price level, 1 (cheap) to 5 (expensive)
    pub fn validate_price_level(price: i32) -> DirectoryResult<i32> {
        if !(1..=5).contains(&price) {
            return Err(DirectoryError::validation("price", "must be between 1 and 5"));
        }
        Ok(price)
    }

    pub fn validate_dish_price(price: f64) -> DirectoryResult<f64> {
        if !price.is_finite() || price <= 0.0 {
            return Err(DirectoryError::validation("price", "must be a positive amount"));
        }
        Ok(price)
    }

    pub fn validate_comment(comment: &str) -> DirectoryResult<String> {
        let trimmed = Self::validate_text("comment", comment)?;

        if trimmed.chars().count() > MAX_DISH_COMMENT_LEN {
            return Err(DirectoryError::validation(
                "comment",
                format!("is too long (max {} characters)", MAX_DISH_COMMENT_LEN),
            ));
        }

        Ok(trimmed)
    }

    /// Validate a list of ids, dropping repeats while keeping first-seen order
    pub fn validate_id_set(field: &str, ids: &[i32]) -> DirectoryResult<Vec<i32>> {
        let mut unique = Vec::with_capacity(ids.len());
        for &id in ids {
            Self::validate_id(field, id)?;
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Ok(unique)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text() {
        assert_eq!(
            ValidationService::validate_text("name", "  Dessert ").unwrap(),
            "Dessert"
        );
        assert!(ValidationService::validate_text("name", "   ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(ValidationService::validate_email("ana@example.com").is_ok());
        assert!(ValidationService::validate_email("ana@example").is_err());
        assert!(ValidationService::validate_email("not an email").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(ValidationService::validate_url("https://bistro.example.com").is_ok());
        assert!(ValidationService::validate_url("http://localhost:8080/menu").is_ok());
        assert!(ValidationService::validate_url("bistro.example.com").is_err());
        assert!(ValidationService::validate_url("ftp://bistro.example.com").is_err());
    }

    #[test]
    fn test_validate_positive_score() {
        assert_eq!(ValidationService::validate_positive_score("score", 3.5).unwrap(), 3.5);
        assert!(ValidationService::validate_positive_score("score", 0.0).is_err());
        assert!(ValidationService::validate_positive_score("score", -1.0).is_err());
        assert!(ValidationService::validate_positive_score("score", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_rating_bounds() {
        assert!(ValidationService::validate_rating("score", 1).is_ok());
        assert!(ValidationService::validate_rating("score", 5).is_ok());
        assert!(ValidationService::validate_rating("score", 0).is_err());
        assert!(ValidationService::validate_rating("score", 6).is_err());
    }

    #[test]
    fn test_validate_comment_length() {
        let ok = "a".repeat(MAX_DISH_COMMENT_LEN);
        let too_long = "a".repeat(MAX_DISH_COMMENT_LEN + 1);
        assert!(ValidationService::validate_comment(&ok).is_ok());
        assert!(ValidationService::validate_comment(&too_long).is_err());
    }

    #[test]
    fn test_validate_id_set_dedupes() {
        let ids = ValidationService::validate_id_set("categories", &[3, 1, 3, 2]).unwrap();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(ValidationService::validate_id_set("categories", &[1, 0]).is_err());
    }
}
