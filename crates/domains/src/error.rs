//! # DomainError
//!
//! Centralized error handling for the movie-review backend.
//! Every failure a caller can see maps to one of the variants below; the API
//! layer turns [`ErrorKind`] into a status code.

use std::fmt;

use thiserror::Error;

/// Store-level uniqueness constraints. A violation, whether caught by a
/// service pre-check or by the store itself, renders the same message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    Username,
    MovieSlug,
    /// One review per (author, movie).
    ReviewPerMovie,
    /// One like per (author, review).
    LikePerReview,
    ReviewSlug,
    CommentSlug,
    LikeSlug,
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            UniqueKey::Username => "A user with that username already exists.",
            UniqueKey::MovieSlug => "A movie with this title and release year already exists.",
            UniqueKey::ReviewPerMovie => "You can't review the same movie twice.",
            UniqueKey::LikePerReview => "You have already liked this post",
            UniqueKey::ReviewSlug => "A review with this slug already exists.",
            UniqueKey::CommentSlug => "A comment with this slug already exists.",
            UniqueKey::LikeSlug => "A like with this slug already exists.",
        };
        f.write_str(msg)
    }
}

/// The primary error type for all domain and service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unknown slug or username.
    #[error("No {entity} matches the given query.")]
    NotFound { entity: &'static str, key: String },

    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    Duplicate(UniqueKey),

    /// Missing, invalid or revoked credentials.
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated, but the policy denies the action.
    #[error("{0}")]
    Forbidden(String),

    /// Infrastructure failure (e.g., DB down). The message is logged, never returned.
    #[error("internal service error: {0}")]
    Internal(String),
}

/// Coarse classification used when rendering an error to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    Internal,
}

impl DomainError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        DomainError::NotFound { entity, key: key.into() }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        DomainError::Internal(err.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Validation(_) | DomainError::Duplicate(_) => ErrorKind::Validation,
            DomainError::Unauthenticated(_) => ErrorKind::Authentication,
            DomainError::Forbidden(_) => ErrorKind::Authorization,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Machine-readable reason string.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "not_found",
            DomainError::Validation(_) => "invalid",
            DomainError::Duplicate(_) => "duplicate",
            DomainError::Unauthenticated(_) => "not_authenticated",
            DomainError::Forbidden(_) => "permission_denied",
            DomainError::Internal(_) => "internal_error",
        }
    }
}

/// A specialized Result type for domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_messages_match_the_wire_contract() {
        assert_eq!(
            DomainError::Duplicate(UniqueKey::ReviewPerMovie).to_string(),
            "You can't review the same movie twice."
        );
        assert_eq!(
            DomainError::Duplicate(UniqueKey::LikePerReview).to_string(),
            "You have already liked this post"
        );
        assert_eq!(DomainError::Duplicate(UniqueKey::Username).kind(), ErrorKind::Validation);
    }

    #[test]
    fn not_found_hides_the_key() {
        let err = DomainError::not_found("Movie", "the-matrix-1999");
        assert_eq!(err.to_string(), "No Movie matches the given query.");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
