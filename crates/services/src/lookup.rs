//! Resolution helpers shared by the content services.

use std::collections::HashMap;

use domains::{DomainError, Movie, MovieRepository, Result, Review, ReviewRepository, UserRepository};
use uuid::Uuid;

/// Memoizes author usernames while rendering a batch of records.
pub(crate) struct Usernames<'a> {
    users: &'a dyn UserRepository,
    seen: HashMap<Uuid, String>,
}

impl<'a> Usernames<'a> {
    pub(crate) fn new(users: &'a dyn UserRepository) -> Self {
        Self { users, seen: HashMap::new() }
    }

    pub(crate) async fn get(&mut self, id: Uuid) -> Result<String> {
        if let Some(name) = self.seen.get(&id) {
            return Ok(name.clone());
        }
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::internal(format!("dangling author reference {id}")))?;
        self.seen.insert(id, user.username.clone());
        Ok(user.username)
    }
}

/// The movie a review input points at. Unknown slugs are input errors, not 404s.
pub(crate) async fn linked_movie(movies: &dyn MovieRepository, slug: &str) -> Result<Movie> {
    movies
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| DomainError::validation("movie: Invalid hyperlink - Object does not exist."))
}

pub(crate) async fn linked_review(reviews: &dyn ReviewRepository, slug: &str) -> Result<Review> {
    reviews
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| DomainError::validation("review: Invalid hyperlink - Object does not exist."))
}

/// Memoizes review slugs for comments and likes.
pub(crate) struct ReviewSlugs<'a> {
    reviews: &'a dyn ReviewRepository,
    seen: HashMap<Uuid, String>,
}

impl<'a> ReviewSlugs<'a> {
    pub(crate) fn new(reviews: &'a dyn ReviewRepository) -> Self {
        Self { reviews, seen: HashMap::new() }
    }

    pub(crate) async fn get(&mut self, id: Uuid) -> Result<String> {
        if let Some(slug) = self.seen.get(&id) {
            return Ok(slug.clone());
        }
        let review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::internal(format!("dangling review reference {id}")))?;
        self.seen.insert(id, review.slug.clone());
        Ok(review.slug)
    }
}
