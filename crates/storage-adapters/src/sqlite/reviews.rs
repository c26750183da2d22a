use async_trait::async_trait;
use domains::{DomainError, Result, Review, ReviewRepository};
use uuid::Uuid;

use super::rows::{CountedReviewRow, ReviewRow};
use super::{map_err, SqliteStore};

const COLUMNS: &str = "id, author_id, movie_id, body, rating, slug, created_at, updated_at";

fn rows_to_reviews(rows: Vec<ReviewRow>) -> Result<Vec<Review>> {
    rows.into_iter().map(Review::try_from).collect()
}

#[async_trait]
impl ReviewRepository for SqliteStore {
    async fn insert(&self, review: &Review) -> Result<()> {
        sqlx::query(
            "INSERT INTO reviews (id, author_id, movie_id, body, rating, slug, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(review.id)
        .bind(review.author_id)
        .bind(review.movie_id)
        .bind(&review.body)
        .bind(i64::from(review.rating))
        .bind(&review.slug)
        .bind(review.created_at)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<()> {
        sqlx::query(
            "UPDATE reviews SET author_id = ?, movie_id = ?, body = ?, rating = ?, updated_at = ? WHERE id = ?",
        )
        .bind(review.author_id)
        .bind(review.movie_id)
        .bind(&review.body)
        .bind(i64::from(review.rating))
        .bind(review.updated_at)
        .bind(review.id)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>> {
        let row: Option<ReviewRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM reviews WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_err)?;
        row.map(Review::try_from).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Review>> {
        let row: Option<ReviewRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM reviews WHERE slug = ?"))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_err)?;
        row.map(Review::try_from).transpose()
    }

    async fn exists_for(&self, author_id: Uuid, movie_id: Uuid) -> Result<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE author_id = ? AND movie_id = ?)",
        )
        .bind(author_id)
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(exists)
    }

    async fn list(&self) -> Result<Vec<Review>> {
        let rows: Vec<ReviewRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM reviews ORDER BY created_at, slug"))
                .fetch_all(&self.pool)
                .await
                .map_err(map_err)?;
        rows_to_reviews(rows)
    }

    async fn list_by_movie(&self, movie_id: Uuid) -> Result<Vec<Review>> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE movie_id = ? ORDER BY created_at, slug"
        ))
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;
        rows_to_reviews(rows)
    }

    async fn list_with_like_counts(&self, movie_id: Uuid) -> Result<Vec<(Review, u64)>> {
        let rows: Vec<CountedReviewRow> = sqlx::query_as(
            "SELECT r.id, r.author_id, r.movie_id, r.body, r.rating, r.slug, r.created_at, r.updated_at, \
                    COUNT(l.id) AS like_count \
             FROM reviews r LEFT JOIN likes l ON l.review_id = r.id \
             WHERE r.movie_id = ? \
             GROUP BY r.id",
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        rows.into_iter()
            .map(|row| -> Result<(Review, u64)> {
                let likes = u64::try_from(row.like_count)
                    .map_err(|_| DomainError::internal("negative like count"))?;
                Ok((Review::try_from(row.review)?, likes))
            })
            .collect()
    }
}
