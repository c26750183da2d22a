//! Slug derivation.

use chrono::{Datelike, NaiveDate};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::error::{DomainError, Result};

/// Lowercase, hyphen-separated, ASCII-only form of `value`.
///
/// The text is NFKD-decomposed and everything outside ASCII is dropped, so
/// accented letters keep their base letter and ligatures split. Then any
/// character that is not alphanumeric, `_`, whitespace or `-` is dropped,
/// runs of whitespace and hyphens collapse to a single `-`, and leading or
/// trailing `-`/`_` are stripped.
pub fn slugify(value: &str) -> String {
    let kept: String = value
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_ascii_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_separator = false;
    for c in kept.chars() {
        if c == '-' || c.is_ascii_whitespace() {
            if !in_separator {
                slug.push('-');
                in_separator = true;
            }
        } else {
            slug.push(c);
            in_separator = false;
        }
    }
    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Slug of a movie: `slugify("{title} {year}")`.
///
/// The release date is mandatory; without it there is no year to
/// disambiguate remakes.
pub fn movie_slug(title: &str, released_date: Option<NaiveDate>) -> Result<String> {
    let released_date = released_date.ok_or_else(|| {
        DomainError::validation("Released date is required to generate the slug.")
    })?;
    Ok(slugify(&format!("{} {}", title, released_date.year())))
}

/// Slug for user content: `slugify("{seed} {author} {8 hex chars}")`.
/// The random tail keeps slugs unique when the same author acts twice.
pub fn suffixed_slug(seed: &str, author: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    slugify(&format!("{seed} {author} {}", &token[..8]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn matrix_example() {
        assert_eq!(movie_slug("The Matrix", date(1999, 3, 31)).unwrap(), "the-matrix-1999");
    }

    #[test]
    fn missing_release_date_is_a_validation_error() {
        let err = movie_slug("The Matrix", None).unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation("Released date is required to generate the slug.".into())
        );
    }

    #[test]
    fn punctuation_and_spacing() {
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("Spider-Man: No Way Home"), "spider-man-no-way-home");
        assert_eq!(slugify("-- _edge_ --"), "edge");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
        assert_eq!(slugify("千と千尋の神隠し 2001"), "2001");
    }

    #[test]
    fn accents_decompose_to_ascii() {
        assert_eq!(slugify("Amélie 2001"), "amelie-2001");
        assert_eq!(slugify("Pelíšky 1999"), "pelisky-1999");
        assert_eq!(slugify("Łódź 2000"), "odz-2000");
        assert_eq!(slugify("ﬁlm 2001"), "film-2001");
        assert_eq!(movie_slug("Ærø Café", date(2010, 1, 1)).unwrap(), "r-cafe-2010");
    }

    #[test]
    fn year_comes_from_the_release_date() {
        assert_eq!(movie_slug("Dune", date(2021, 10, 22)).unwrap(), "dune-2021");
        assert_eq!(movie_slug("Dune", date(1984, 12, 14)).unwrap(), "dune-1984");
    }

    #[test]
    fn suffixed_slugs_differ() {
        let a = suffixed_slug("the-matrix-1999", "neo");
        let b = suffixed_slug("the-matrix-1999", "neo");
        assert!(a.starts_with("the-matrix-1999-neo-"));
        assert_eq!(a.len(), "the-matrix-1999-neo-".len() + 8);
        assert_ne!(a, b);
    }
}
