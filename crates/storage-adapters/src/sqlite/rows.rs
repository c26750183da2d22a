//! Row shapes as stored, and their conversion into domain models.

use chrono::{DateTime, NaiveDate, Utc};
use domains::{Comment, DomainError, Like, Movie, Review, User};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    is_admin: bool,
    date_joined: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            is_admin: row.is_admin,
            date_joined: row.date_joined,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct MovieRow {
    id: Uuid,
    title: String,
    director: String,
    trailer: Option<String>,
    summary: String,
    released_date: NaiveDate,
    slug: String,
    /// JSON array of strings.
    tags: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MovieRow> for Movie {
    type Error = DomainError;

    fn try_from(row: MovieRow) -> Result<Self, Self::Error> {
        let tags = serde_json::from_str(&row.tags)
            .map_err(|e| DomainError::internal(format!("corrupt tags on movie {}: {e}", row.id)))?;
        Ok(Movie {
            id: row.id,
            title: row.title,
            director: row.director,
            trailer: row.trailer,
            summary: row.summary,
            released_date: row.released_date,
            slug: row.slug,
            tags,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ReviewRow {
    id: Uuid,
    author_id: Uuid,
    movie_id: Uuid,
    body: String,
    rating: i64,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = DomainError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let rating = u8::try_from(row.rating)
            .map_err(|_| DomainError::internal(format!("rating out of range on review {}", row.id)))?;
        Ok(Review {
            id: row.id,
            author_id: row.author_id,
            movie_id: row.movie_id,
            body: row.body,
            rating,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CountedReviewRow {
    #[sqlx(flatten)]
    pub(crate) review: ReviewRow,
    pub(crate) like_count: i64,
}

#[derive(sqlx::FromRow)]
pub(crate) struct CommentRow {
    id: Uuid,
    author_id: Uuid,
    review_id: Uuid,
    body: String,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            author_id: row.author_id,
            review_id: row.review_id,
            body: row.body,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct LikeRow {
    id: Uuid,
    author_id: Uuid,
    review_id: Uuid,
    slug: String,
    created_at: DateTime<Utc>,
}

impl From<LikeRow> for Like {
    fn from(row: LikeRow) -> Self {
        Like {
            id: row.id,
            author_id: row.author_id,
            review_id: row.review_id,
            slug: row.slug,
            created_at: row.created_at,
        }
    }
}
