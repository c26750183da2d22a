//! # SQLite store
//!
//! This module implements the data mapping between the SQLite relational
//! model and the `domains` models. A single [`SqliteStore`] implements every
//! repository port; it is cheap to clone (the pool is reference counted).

mod comments;
mod likes;
mod movies;
mod reviews;
mod rows;
mod users;

use std::str::FromStr;

use domains::{DomainError, UniqueKey};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use tracing::{info, warn};

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and applies pending
    /// migrations.
    ///
    /// In-memory databases exist per connection, so they get a single
    /// connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!(in_memory, "sqlite store ready");
        Ok(Self { pool })
    }

    /// A fresh, migrated in-memory database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        Self::connect("sqlite::memory:", 1).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Maps driver errors to the domain taxonomy. Uniqueness violations become
/// [`DomainError::Duplicate`]; everything else is internal.
pub(crate) fn map_err(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            if let Some(key) = unique_key(db.message()) {
                return DomainError::Duplicate(key);
            }
        }
    }
    warn!(error = %err, "sqlite error");
    DomainError::internal(err)
}

/// SQLite reports violations as `UNIQUE constraint failed: table.col[, table.col]`.
fn unique_key(message: &str) -> Option<UniqueKey> {
    let (_, columns) = message.split_once("UNIQUE constraint failed: ")?;
    let key = match columns.trim() {
        "users.username" => UniqueKey::Username,
        "movies.slug" => UniqueKey::MovieSlug,
        "reviews.author_id, reviews.movie_id" => UniqueKey::ReviewPerMovie,
        "likes.author_id, likes.review_id" => UniqueKey::LikePerReview,
        "reviews.slug" => UniqueKey::ReviewSlug,
        "comments.slug" => UniqueKey::CommentSlug,
        "likes.slug" => UniqueKey::LikeSlug,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, Utc};
    use domains::{Comment, Like, Movie, Review, User};
    use uuid::Uuid;

    pub fn user(username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.into(),
            email: format!("{username}@zion.io"),
            password_hash: "$argon2id$placeholder".into(),
            first_name: String::new(),
            last_name: String::new(),
            is_admin: false,
            date_joined: Utc::now(),
        }
    }

    pub fn movie(title: &str, year: i32) -> Movie {
        Movie {
            id: Uuid::new_v4(),
            title: title.into(),
            director: "The Wachowskis".into(),
            trailer: None,
            summary: String::new(),
            released_date: NaiveDate::from_ymd_opt(year, 3, 31).unwrap(),
            slug: domains::slugify(&format!("{title} {year}")),
            tags: vec!["sci-fi".into()],
            created_at: Utc::now(),
        }
    }

    pub fn review(author: &User, movie: &Movie) -> Review {
        let now = Utc::now();
        Review {
            id: Uuid::new_v4(),
            author_id: author.id,
            movie_id: movie.id,
            body: "Whoa.".into(),
            rating: 5,
            slug: domains::suffixed_slug(&movie.slug, &author.username),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn comment(author: &User, review: &Review) -> Comment {
        let now = Utc::now();
        Comment {
            id: Uuid::new_v4(),
            author_id: author.id,
            review_id: review.id,
            body: "Agreed.".into(),
            slug: domains::suffixed_slug("comment", &author.username),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn like(author: &User, review: &Review) -> Like {
        Like {
            id: Uuid::new_v4(),
            author_id: author.id,
            review_id: review.id,
            slug: domains::suffixed_slug("like", &author.username),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_messages_map_to_keys() {
        assert_eq!(
            unique_key("UNIQUE constraint failed: reviews.author_id, reviews.movie_id"),
            Some(UniqueKey::ReviewPerMovie)
        );
        assert_eq!(unique_key("UNIQUE constraint failed: users.username"), Some(UniqueKey::Username));
        assert_eq!(unique_key("UNIQUE constraint failed: other.thing"), None);
        assert_eq!(unique_key("FOREIGN KEY constraint failed"), None);
    }

    #[tokio::test]
    async fn in_memory_store_migrates() {
        let store = SqliteStore::in_memory().await.unwrap();
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'movies', 'reviews', 'comments', 'likes')",
        )
        .fetch_one(store.pool())
        .await
        .unwrap();
        assert_eq!(count, 5);
    }
}
