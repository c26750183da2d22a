//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be used by the binary.
//! Repositories surface uniqueness violations as [`DomainError::Duplicate`]
//! so the store, not a pre-check, has the last word on duplicates.
//!
//! [`DomainError::Duplicate`]: crate::error::DomainError::Duplicate

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Comment, Like, Movie, MovieQuery, Review, TokenPair, User};

/// Persistence contract for accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<()>;
    async fn update(&self, user: &User) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    /// All users, ordered by username.
    async fn list(&self) -> Result<Vec<User>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn insert(&self, movie: &Movie) -> Result<()>;
    async fn update(&self, movie: &Movie) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Movie>>;
    async fn list(&self, query: &MovieQuery) -> Result<Vec<Movie>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert(&self, review: &Review) -> Result<()>;
    async fn update(&self, review: &Review) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Review>>;
    async fn exists_for(&self, author_id: Uuid, movie_id: Uuid) -> Result<bool>;
    /// All reviews, oldest first.
    async fn list(&self) -> Result<Vec<Review>>;
    async fn list_by_movie(&self, movie_id: Uuid) -> Result<Vec<Review>>;
    /// Reviews of one movie paired with their like counts, unordered.
    async fn list_with_like_counts(&self, movie_id: Uuid) -> Result<Vec<(Review, u64)>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: &Comment) -> Result<()>;
    async fn update(&self, comment: &Comment) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Comment>>;
    async fn list(&self) -> Result<Vec<Comment>>;
    async fn list_by_review(&self, review_id: Uuid) -> Result<Vec<Comment>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn insert(&self, like: &Like) -> Result<()>;
    async fn update(&self, like: &Like) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Like>>;
    async fn exists_for(&self, author_id: Uuid, review_id: Uuid) -> Result<bool>;
    async fn list(&self) -> Result<Vec<Like>>;
    async fn list_by_review(&self, review_id: Uuid) -> Result<Vec<Like>>;
}

/// One-way password hashing.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    /// `false` for a wrong password and for an unparseable hash alike.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Identity/token collaborator. Implementations own the token format; the
/// core only learns which user a token belongs to.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: Uuid) -> Result<TokenPair>;
    /// Resolves an access token to its user id.
    fn verify_access(&self, token: &str) -> Result<Uuid>;
    /// Exchanges a live refresh token for a fresh access token.
    fn refresh(&self, refresh_token: &str) -> Result<String>;
    /// Revokes a refresh token; later refreshes with it fail.
    fn revoke(&self, refresh_token: &str) -> Result<()>;
}
