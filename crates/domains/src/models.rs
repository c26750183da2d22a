//! # Domain Models
//!
//! These structs represent the core entities of the review site.
//! Ids are random v4 UUIDs; slugs are the public lookup keys.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub director: String,
    pub trailer: Option<String>,
    pub summary: String,
    pub released_date: NaiveDate,
    /// Derived from title and release year at creation; read-only afterwards.
    pub slug: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub author_id: Uuid,
    pub movie_id: Uuid,
    pub body: String,
    /// 1 to 5 inclusive.
    pub rating: u8,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub review_id: Uuid,
    pub body: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub author_id: Uuid,
    pub review_id: Uuid,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Access/refresh pair handed out at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Columns a movie listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieOrderField {
    #[default]
    Title,
    Director,
    ReleasedDate,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovieOrdering {
    pub field: MovieOrderField,
    pub descending: bool,
}

impl FromStr for MovieOrdering {
    type Err = DomainError;

    /// Parses `title`, `-released_date` and friends.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let field = match name {
            "title" => MovieOrderField::Title,
            "director" => MovieOrderField::Director,
            "released_date" => MovieOrderField::ReleasedDate,
            "created_at" => MovieOrderField::CreatedAt,
            other => {
                return Err(DomainError::validation(format!(
                    "ordering: '{other}' is not a valid ordering field."
                )))
            }
        };
        Ok(MovieOrdering { field, descending })
    }
}

impl fmt::Display for MovieOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.field {
            MovieOrderField::Title => "title",
            MovieOrderField::Director => "director",
            MovieOrderField::ReleasedDate => "released_date",
            MovieOrderField::CreatedAt => "created_at",
        };
        if self.descending {
            write!(f, "-{name}")
        } else {
            f.write_str(name)
        }
    }
}

/// Filters accepted by the movie listing. Every filter is optional; text
/// filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieQuery {
    /// Matches title, director or the ISO release date.
    pub search: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub year: Option<i32>,
    /// Exact tag.
    pub tag: Option<String>,
    pub ordering: MovieOrdering,
}
