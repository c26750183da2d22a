use async_trait::async_trait;
use domains::{Like, LikeRepository, Result};
use uuid::Uuid;

use super::rows::LikeRow;
use super::{map_err, SqliteStore};

const COLUMNS: &str = "id, author_id, review_id, slug, created_at";

#[async_trait]
impl LikeRepository for SqliteStore {
    async fn insert(&self, like: &Like) -> Result<()> {
        sqlx::query("INSERT INTO likes (id, author_id, review_id, slug, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(like.id)
            .bind(like.author_id)
            .bind(like.review_id)
            .bind(&like.slug)
            .bind(like.created_at)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn update(&self, like: &Like) -> Result<()> {
        sqlx::query("UPDATE likes SET author_id = ?, review_id = ? WHERE id = ?")
            .bind(like.author_id)
            .bind(like.review_id)
            .bind(like.id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM likes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Like>> {
        let row: Option<LikeRow> = sqlx::query_as(&format!("SELECT {COLUMNS} FROM likes WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(row.map(Like::from))
    }

    async fn exists_for(&self, author_id: Uuid, review_id: Uuid) -> Result<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM likes WHERE author_id = ? AND review_id = ?)")
                .bind(author_id)
                .bind(review_id)
                .fetch_one(&self.pool)
                .await
                .map_err(map_err)?;
        Ok(exists)
    }

    async fn list(&self) -> Result<Vec<Like>> {
        let rows: Vec<LikeRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM likes ORDER BY created_at, slug"))
                .fetch_all(&self.pool)
                .await
                .map_err(map_err)?;
        Ok(rows.into_iter().map(Like::from).collect())
    }

    async fn list_by_review(&self, review_id: Uuid) -> Result<Vec<Like>> {
        let rows: Vec<LikeRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM likes WHERE review_id = ? ORDER BY created_at, slug"
        ))
        .bind(review_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(rows.into_iter().map(Like::from).collect())
    }
}
