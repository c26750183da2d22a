//! Likes: one per (author, review).

use std::sync::Arc;

use chrono::Utc;
use domains::validation;
use domains::{
    authorize, suffixed_slug, Action, Actor, DomainError, EntityKind, Like, LikeRepository,
    Result, ReviewRepository, UniqueKey, UserRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::lookup::{linked_review, ReviewSlugs, Usernames};

/// Like input; `review` is the liked review's slug.
#[derive(Debug, Clone, Default)]
pub struct LikeChanges {
    pub review: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LikeDetails {
    pub like: Like,
    pub author_username: String,
    pub review_slug: String,
}

#[derive(Clone)]
pub struct LikeService {
    users: Arc<dyn UserRepository>,
    reviews: Arc<dyn ReviewRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        reviews: Arc<dyn ReviewRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self { users, reviews, likes }
    }

    pub async fn list(&self) -> Result<Vec<LikeDetails>> {
        let likes = self.likes.list().await?;
        self.render(likes).await
    }

    pub async fn get(&self, slug: &str) -> Result<LikeDetails> {
        let like = self.find(slug).await?;
        self.render_one(like).await
    }

    #[tracing::instrument(skip_all, fields(review = ?input.review))]
    pub async fn create(&self, actor: &Actor, input: LikeChanges) -> Result<LikeDetails> {
        authorize(actor, EntityKind::Like, Action::Create, None)?;
        let identity = actor.require()?;

        let review_slug = validation::required("review", input.review)?;
        let review = linked_review(self.reviews.as_ref(), &review_slug).await?;

        if self.likes.exists_for(identity.user_id, review.id).await? {
            return Err(DomainError::Duplicate(UniqueKey::LikePerReview));
        }

        let like = Like {
            id: Uuid::new_v4(),
            author_id: identity.user_id,
            review_id: review.id,
            slug: suffixed_slug("like", &identity.username),
            created_at: Utc::now(),
        };
        self.likes.insert(&like).await?;
        info!(slug = %like.slug, review = %review.slug, "like created");
        Ok(LikeDetails { like, author_username: identity.username.clone(), review_slug: review.slug })
    }

    /// The acting identity becomes the author on every save.
    #[tracing::instrument(skip(self, actor, changes))]
    pub async fn update(
        &self,
        actor: &Actor,
        slug: &str,
        changes: LikeChanges,
        full: bool,
    ) -> Result<LikeDetails> {
        let mut like = self.find(slug).await?;
        authorize(actor, EntityKind::Like, Action::Update, Some(like.author_id))?;
        let identity = actor.require()?;

        if full {
            validation::required("review", changes.review.as_ref())?;
        }
        if let Some(review_slug) = changes.review {
            like.review_id = linked_review(self.reviews.as_ref(), &review_slug).await?.id;
        }
        like.author_id = identity.user_id;

        self.likes.update(&like).await?;
        info!(slug = %like.slug, "like updated");
        self.render_one(like).await
    }

    #[tracing::instrument(skip(self, actor))]
    pub async fn delete(&self, actor: &Actor, slug: &str) -> Result<()> {
        let like = self.find(slug).await?;
        authorize(actor, EntityKind::Like, Action::Delete, Some(like.author_id))?;
        self.likes.delete(like.id).await?;
        info!(slug = %like.slug, "like deleted");
        Ok(())
    }

    async fn find(&self, slug: &str) -> Result<Like> {
        self.likes
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Like.name(), slug))
    }

    async fn render_one(&self, like: Like) -> Result<LikeDetails> {
        let mut rendered = self.render(vec![like]).await?;
        rendered.pop().ok_or_else(|| DomainError::internal("like vanished while rendering"))
    }

    async fn render(&self, likes: Vec<Like>) -> Result<Vec<LikeDetails>> {
        let mut usernames = Usernames::new(self.users.as_ref());
        let mut review_slugs = ReviewSlugs::new(self.reviews.as_ref());
        let mut out = Vec::with_capacity(likes.len());
        for like in likes {
            out.push(LikeDetails {
                author_username: usernames.get(like.author_id).await?,
                review_slug: review_slugs.get(like.review_id).await?,
                like,
            });
        }
        Ok(out)
    }
}
