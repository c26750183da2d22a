//! Field-level input checks shared by the services.
//!
//! Messages are prefixed with the offending field so clients can attach them
//! to the right input.

use crate::error::{DomainError, Result};

pub const USERNAME_MAX_LEN: usize = 150;
pub const TITLE_MAX_LEN: usize = 255;
pub const RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

fn invalid(field: &str, msg: &str) -> DomainError {
    DomainError::Validation(format!("{field}: {msg}"))
}

pub fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| invalid(field, "This field is required."))
}

pub fn username(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid("username", "This field may not be blank."));
    }
    if value.chars().count() > USERNAME_MAX_LEN {
        return Err(invalid("username", "Ensure this field has no more than 150 characters."));
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !value.chars().all(allowed) {
        return Err(invalid(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        ));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<()> {
    let bad = || invalid("email", "Enter a valid email address.");
    let (local, domain) = value.split_once('@').ok_or_else(bad)?;
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty());
    if local.is_empty() || !domain_ok || value.chars().any(char::is_whitespace) {
        return Err(bad());
    }
    Ok(())
}

pub fn password(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid("password", "This field may not be blank."));
    }
    Ok(())
}

/// Title-like text: required, bounded.
pub fn title(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, "This field may not be blank."));
    }
    bounded(field, value)
}

/// Optional text with the title length bound.
pub fn bounded(field: &str, value: &str) -> Result<()> {
    if value.chars().count() > TITLE_MAX_LEN {
        return Err(invalid(field, "Ensure this field has no more than 255 characters."));
    }
    Ok(())
}

pub fn url(field: &str, value: &str) -> Result<()> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .ok_or_else(|| invalid(field, "Enter a valid URL."))?;
    if rest.is_empty() || rest.starts_with('/') || rest.chars().any(char::is_whitespace) {
        return Err(invalid(field, "Enter a valid URL."));
    }
    Ok(())
}

pub fn body(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid("body", "This field may not be blank."));
    }
    Ok(())
}

/// Ratings arrive as plain integers from the wire.
pub fn rating(value: i64) -> Result<u8> {
    if !RATING_RANGE.contains(&value) {
        return Err(invalid("rating", "Ensure this value is between 1 and 5."));
    }
    Ok(value as u8)
}

/// Trims, drops empties and duplicates, keeps first-seen order.
pub fn tags(values: Vec<String>) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for tag in values {
        let tag = tag.trim().to_string();
        if tag.is_empty() || out.contains(&tag) {
            continue;
        }
        bounded("tags", &tag)?;
        out.push(tag);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert!(username("neo.anderson+1@zion_-").is_ok());
        assert!(username("").is_err());
        assert!(username("has space").is_err());
        assert!(username(&"a".repeat(150)).is_ok());
        assert!(username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn emails() {
        assert!(email("neo@matrix.io").is_ok());
        assert!(email("neo@localhost").is_err());
        assert!(email("@matrix.io").is_err());
        assert!(email("neo@@matrix.io").is_err());
        assert!(email("neo@matrix..io").is_err());
        assert!(email("ne o@matrix.io").is_err());
    }

    #[test]
    fn ratings() {
        assert_eq!(rating(1).unwrap(), 1);
        assert_eq!(rating(5).unwrap(), 5);
        assert!(rating(0).is_err());
        assert!(rating(6).is_err());
    }

    #[test]
    fn urls() {
        assert!(url("trailer", "https://youtu.be/abc").is_ok());
        assert!(url("trailer", "ftp://example.com").is_err());
        assert!(url("trailer", "https://").is_err());
    }

    #[test]
    fn tags_are_normalized() {
        let tags = tags(vec![" sci-fi ".into(), "".into(), "sci-fi".into(), "action".into()]).unwrap();
        assert_eq!(tags, ["sci-fi", "action"]);
    }

    #[test]
    fn required_reports_the_field() {
        let err = required::<String>("title", None).unwrap_err();
        assert_eq!(err.to_string(), "title: This field is required.");
    }
}
