//! Reviews: one per (author, movie), ranked by likes on the movie page.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use domains::validation;
use domains::{
    authorize, rank_by_likes, suffixed_slug, Action, Actor, CommentRepository, DomainError,
    EntityKind, LikeRepository, MovieRepository, Result, Review, ReviewRepository, UniqueKey,
    UserRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::lookup::{linked_movie, Usernames};

/// Review input; `movie` is the target movie's slug.
#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub movie: Option<String>,
    pub body: Option<String>,
    pub rating: Option<i64>,
}

/// A review with everything its wire form links to.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDetails {
    pub review: Review,
    pub author_username: String,
    pub movie_slug: String,
    pub comment_slugs: Vec<String>,
    pub like_slugs: Vec<String>,
}

impl ReviewDetails {
    pub fn likes_count(&self) -> usize {
        self.like_slugs.len()
    }
}

#[derive(Clone)]
pub struct ReviewService {
    users: Arc<dyn UserRepository>,
    movies: Arc<dyn MovieRepository>,
    reviews: Arc<dyn ReviewRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl ReviewService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        movies: Arc<dyn MovieRepository>,
        reviews: Arc<dyn ReviewRepository>,
        comments: Arc<dyn CommentRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self { users, movies, reviews, comments, likes }
    }

    pub async fn list(&self) -> Result<Vec<ReviewDetails>> {
        let reviews = self.reviews.list().await?;
        self.render(reviews).await
    }

    pub async fn get(&self, slug: &str) -> Result<ReviewDetails> {
        let review = self.find(slug).await?;
        let mut rendered = self.render(vec![review]).await?;
        rendered.pop().ok_or_else(|| DomainError::internal("review vanished while rendering"))
    }

    /// Reviews of one movie, most liked first.
    pub async fn most_liked(&self, movie_slug: &str) -> Result<Vec<ReviewDetails>> {
        let movie = self
            .movies
            .find_by_slug(movie_slug)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Movie.name(), movie_slug))?;
        let counted = self.reviews.list_with_like_counts(movie.id).await?;
        let ranked = rank_by_likes(counted).into_iter().map(|r| r.review).collect();
        self.render(ranked).await
    }

    #[tracing::instrument(skip_all, fields(movie = ?input.movie))]
    pub async fn create(&self, actor: &Actor, input: ReviewChanges) -> Result<ReviewDetails> {
        authorize(actor, EntityKind::Review, Action::Create, None)?;
        let identity = actor.require()?;

        let movie_slug = validation::required("movie", input.movie)?;
        let body = validation::required("body", input.body)?;
        let rating = validation::required("rating", input.rating)?;
        validation::body(&body)?;
        let rating = validation::rating(rating)?;
        let movie = linked_movie(self.movies.as_ref(), &movie_slug).await?;

        // The store enforces this too; checking first gives the common case
        // a cheap, early answer.
        if self.reviews.exists_for(identity.user_id, movie.id).await? {
            return Err(DomainError::Duplicate(UniqueKey::ReviewPerMovie));
        }

        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            author_id: identity.user_id,
            movie_id: movie.id,
            body,
            rating,
            slug: suffixed_slug(&movie.slug, &identity.username),
            created_at: now,
            updated_at: now,
        };
        self.reviews.insert(&review).await?;
        info!(slug = %review.slug, "review created");
        Ok(ReviewDetails {
            review,
            author_username: identity.username.clone(),
            movie_slug: movie.slug,
            comment_slugs: Vec::new(),
            like_slugs: Vec::new(),
        })
    }

    /// The acting identity becomes the author on every save.
    #[tracing::instrument(skip(self, actor, changes))]
    pub async fn update(
        &self,
        actor: &Actor,
        slug: &str,
        changes: ReviewChanges,
        full: bool,
    ) -> Result<ReviewDetails> {
        let mut review = self.find(slug).await?;
        authorize(actor, EntityKind::Review, Action::Update, Some(review.author_id))?;
        let identity = actor.require()?;

        if full {
            validation::required("movie", changes.movie.as_ref())?;
            validation::required("body", changes.body.as_ref())?;
            validation::required("rating", changes.rating)?;
        }
        if let Some(movie_slug) = changes.movie {
            review.movie_id = linked_movie(self.movies.as_ref(), &movie_slug).await?.id;
        }
        if let Some(body) = changes.body {
            validation::body(&body)?;
            review.body = body;
        }
        if let Some(rating) = changes.rating {
            review.rating = validation::rating(rating)?;
        }
        review.author_id = identity.user_id;
        review.updated_at = Utc::now();

        self.reviews.update(&review).await?;
        info!(slug = %review.slug, "review updated");
        let mut rendered = self.render(vec![review]).await?;
        rendered.pop().ok_or_else(|| DomainError::internal("review vanished while rendering"))
    }

    #[tracing::instrument(skip(self, actor))]
    pub async fn delete(&self, actor: &Actor, slug: &str) -> Result<()> {
        let review = self.find(slug).await?;
        authorize(actor, EntityKind::Review, Action::Delete, Some(review.author_id))?;
        self.reviews.delete(review.id).await?;
        info!(slug = %review.slug, "review deleted");
        Ok(())
    }

    async fn find(&self, slug: &str) -> Result<Review> {
        self.reviews
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Review.name(), slug))
    }

    async fn render(&self, reviews: Vec<Review>) -> Result<Vec<ReviewDetails>> {
        let mut usernames = Usernames::new(self.users.as_ref());
        let mut movie_slugs: HashMap<Uuid, String> = HashMap::new();
        let mut out = Vec::with_capacity(reviews.len());
        for review in reviews {
            let movie_slug = match movie_slugs.get(&review.movie_id) {
                Some(slug) => slug.clone(),
                None => {
                    let movie = self.movies.find_by_id(review.movie_id).await?.ok_or_else(|| {
                        DomainError::internal(format!("dangling movie reference {}", review.movie_id))
                    })?;
                    movie_slugs.insert(movie.id, movie.slug.clone());
                    movie.slug
                }
            };
            let comment_slugs =
                self.comments.list_by_review(review.id).await?.into_iter().map(|c| c.slug).collect();
            let like_slugs =
                self.likes.list_by_review(review.id).await?.into_iter().map(|l| l.slug).collect();
            out.push(ReviewDetails {
                author_username: usernames.get(review.author_id).await?,
                movie_slug,
                comment_slugs,
                like_slugs,
                review,
            });
        }
        Ok(out)
    }
}
