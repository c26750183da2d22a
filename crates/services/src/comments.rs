//! Comments on reviews.

use std::sync::Arc;

use chrono::Utc;
use domains::validation;
use domains::{
    authorize, suffixed_slug, Action, Actor, Comment, CommentRepository, DomainError, EntityKind,
    Result, ReviewRepository, UserRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::lookup::{linked_review, ReviewSlugs, Usernames};

/// Comment input; `review` is the target review's slug.
#[derive(Debug, Clone, Default)]
pub struct CommentChanges {
    pub review: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentDetails {
    pub comment: Comment,
    pub author_username: String,
    pub review_slug: String,
}

#[derive(Clone)]
pub struct CommentService {
    users: Arc<dyn UserRepository>,
    reviews: Arc<dyn ReviewRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        reviews: Arc<dyn ReviewRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self { users, reviews, comments }
    }

    pub async fn list(&self) -> Result<Vec<CommentDetails>> {
        let comments = self.comments.list().await?;
        self.render(comments).await
    }

    pub async fn get(&self, slug: &str) -> Result<CommentDetails> {
        let comment = self.find(slug).await?;
        self.render_one(comment).await
    }

    #[tracing::instrument(skip_all, fields(review = ?input.review))]
    pub async fn create(&self, actor: &Actor, input: CommentChanges) -> Result<CommentDetails> {
        authorize(actor, EntityKind::Comment, Action::Create, None)?;
        let identity = actor.require()?;

        let review_slug = validation::required("review", input.review)?;
        let body = validation::required("body", input.body)?;
        validation::body(&body)?;
        let review = linked_review(self.reviews.as_ref(), &review_slug).await?;

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            author_id: identity.user_id,
            review_id: review.id,
            body,
            slug: suffixed_slug("comment", &identity.username),
            created_at: now,
            updated_at: now,
        };
        self.comments.insert(&comment).await?;
        info!(slug = %comment.slug, "comment created");
        Ok(CommentDetails {
            comment,
            author_username: identity.username.clone(),
            review_slug: review.slug,
        })
    }

    /// The acting identity becomes the author on every save.
    #[tracing::instrument(skip(self, actor, changes))]
    pub async fn update(
        &self,
        actor: &Actor,
        slug: &str,
        changes: CommentChanges,
        full: bool,
    ) -> Result<CommentDetails> {
        let mut comment = self.find(slug).await?;
        authorize(actor, EntityKind::Comment, Action::Update, Some(comment.author_id))?;
        let identity = actor.require()?;

        if full {
            validation::required("review", changes.review.as_ref())?;
            validation::required("body", changes.body.as_ref())?;
        }
        if let Some(review_slug) = changes.review {
            comment.review_id = linked_review(self.reviews.as_ref(), &review_slug).await?.id;
        }
        if let Some(body) = changes.body {
            validation::body(&body)?;
            comment.body = body;
        }
        comment.author_id = identity.user_id;
        comment.updated_at = Utc::now();

        self.comments.update(&comment).await?;
        info!(slug = %comment.slug, "comment updated");
        self.render_one(comment).await
    }

    #[tracing::instrument(skip(self, actor))]
    pub async fn delete(&self, actor: &Actor, slug: &str) -> Result<()> {
        let comment = self.find(slug).await?;
        authorize(actor, EntityKind::Comment, Action::Delete, Some(comment.author_id))?;
        self.comments.delete(comment.id).await?;
        info!(slug = %comment.slug, "comment deleted");
        Ok(())
    }

    async fn find(&self, slug: &str) -> Result<Comment> {
        self.comments
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Comment.name(), slug))
    }

    async fn render_one(&self, comment: Comment) -> Result<CommentDetails> {
        let mut rendered = self.render(vec![comment]).await?;
        rendered.pop().ok_or_else(|| DomainError::internal("comment vanished while rendering"))
    }

    async fn render(&self, comments: Vec<Comment>) -> Result<Vec<CommentDetails>> {
        let mut usernames = Usernames::new(self.users.as_ref());
        let mut review_slugs = ReviewSlugs::new(self.reviews.as_ref());
        let mut out = Vec::with_capacity(comments.len());
        for comment in comments {
            out.push(CommentDetails {
                author_username: usernames.get(comment.author_id).await?,
                review_slug: review_slugs.get(comment.review_id).await?,
                comment,
            });
        }
        Ok(out)
    }
}
