use async_trait::async_trait;
use domains::{Comment, CommentRepository, Result};
use uuid::Uuid;

use super::rows::CommentRow;
use super::{map_err, SqliteStore};

const COLUMNS: &str = "id, author_id, review_id, body, slug, created_at, updated_at";

#[async_trait]
impl CommentRepository for SqliteStore {
    async fn insert(&self, comment: &Comment) -> Result<()> {
        sqlx::query(
            "INSERT INTO comments (id, author_id, review_id, body, slug, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(comment.id)
        .bind(comment.author_id)
        .bind(comment.review_id)
        .bind(&comment.body)
        .bind(&comment.slug)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn update(&self, comment: &Comment) -> Result<()> {
        sqlx::query("UPDATE comments SET author_id = ?, review_id = ?, body = ?, updated_at = ? WHERE id = ?")
            .bind(comment.author_id)
            .bind(comment.review_id)
            .bind(&comment.body)
            .bind(comment.updated_at)
            .bind(comment.id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Comment>> {
        let row: Option<CommentRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM comments WHERE slug = ?"))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_err)?;
        Ok(row.map(Comment::from))
    }

    async fn list(&self) -> Result<Vec<Comment>> {
        let rows: Vec<CommentRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM comments ORDER BY created_at, slug"))
                .fetch_all(&self.pool)
                .await
                .map_err(map_err)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn list_by_review(&self, review_id: Uuid) -> Result<Vec<Comment>> {
        let rows: Vec<CommentRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM comments WHERE review_id = ? ORDER BY created_at, slug"
        ))
        .bind(review_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
