/// Input validation utilities for the Pulse core.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, ServiceError};

// Compile regex patterns once at startup. The patterns are hardcoded and
// always valid.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

static HANDLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]{3,32}$")
        .expect("hardcoded handle regex is invalid - fix source code")
});

/// Validate email format (RFC 5322 simplified)
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Validate handle format (3-32 characters, alphanumeric with - and _)
pub fn validate_handle(handle: &str) -> bool {
    HANDLE_REGEX.is_match(handle)
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate password length (at least 6 characters)
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

const DEFAULT_LIMIT: i64 = 10;
const DEFAULT_SKIP: i64 = 0;

/// Skip/limit window parsed from query-style input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub skip: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            skip: DEFAULT_SKIP,
        }
    }
}

impl Pagination {
    pub fn new(limit: i64, skip: i64) -> Self {
        Self { limit, skip }
    }

    /// Parse `limit`/`skip` query parameters. Missing values take the
    /// defaults (10 / 0); non-integers and negatives are `BadRequest`.
    pub fn from_query(limit: Option<&str>, skip: Option<&str>) -> Result<Self> {
        Ok(Self {
            limit: parse_non_negative("limit", limit, DEFAULT_LIMIT)?,
            skip: parse_non_negative("skip", skip, DEFAULT_SKIP)?,
        })
    }
}

fn parse_non_negative(name: &str, raw: Option<&str>, default: i64) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: i64 = raw.parse().map_err(|_| {
        ServiceError::BadRequest(format!("{} must be an integer, got {:?}", name, raw))
    })?;
    if value < 0 {
        return Err(ServiceError::BadRequest(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_emails() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("test.user+tag@sub.example.co.uk"));
    }

    #[test]
    fn invalid_emails() {
        assert!(!validate_email(""));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("missing@tld"));
    }

    #[test]
    fn handle_shapes() {
        assert!(validate_handle("alice"));
        assert!(validate_handle("al_ice-99"));
        assert!(!validate_handle("al"));
        assert!(!validate_handle("has spaces"));
    }

    #[test]
    fn password_length_floor() {
        assert!(validate_password("secret"));
        assert!(validate_password("secret1"));
        assert!(!validate_password("short"));
        assert!(!validate_password(""));
    }

    #[test]
    fn pagination_defaults() {
        let page = Pagination::from_query(None, None).unwrap();
        assert_eq!(page, Pagination::new(10, 0));
    }

    #[test]
    fn pagination_parses_values() {
        let page = Pagination::from_query(Some("2"), Some("1")).unwrap();
        assert_eq!(page, Pagination::new(2, 1));
    }

    #[test]
    fn pagination_rejects_garbage_and_negatives() {
        assert!(Pagination::from_query(Some("abc"), None).is_err());
        assert!(Pagination::from_query(None, Some("-1")).is_err());
        assert!(Pagination::from_query(Some("1.5"), None).is_err());
    }
}
