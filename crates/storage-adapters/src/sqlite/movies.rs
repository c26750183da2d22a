use async_trait::async_trait;
use domains::{DomainError, Movie, MovieOrderField, MovieQuery, MovieRepository, Result};
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

use super::rows::MovieRow;
use super::{map_err, SqliteStore};

const SELECT: &str = "SELECT id, title, director, trailer, summary, released_date, slug, tags, created_at FROM movies";

fn tags_json(movie: &Movie) -> Result<String> {
    serde_json::to_string(&movie.tags).map_err(DomainError::internal)
}

/// `%needle%` with LIKE wildcards in the needle escaped.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn order_column(field: MovieOrderField) -> &'static str {
    match field {
        MovieOrderField::Title => "title",
        MovieOrderField::Director => "director",
        MovieOrderField::ReleasedDate => "released_date",
        MovieOrderField::CreatedAt => "created_at",
    }
}

#[async_trait]
impl MovieRepository for SqliteStore {
    async fn insert(&self, movie: &Movie) -> Result<()> {
        sqlx::query(
            "INSERT INTO movies (id, title, director, trailer, summary, released_date, slug, tags, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(movie.id)
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(&movie.trailer)
        .bind(&movie.summary)
        .bind(movie.released_date)
        .bind(&movie.slug)
        .bind(tags_json(movie)?)
        .bind(movie.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    /// The slug column is never rewritten.
    async fn update(&self, movie: &Movie) -> Result<()> {
        sqlx::query(
            "UPDATE movies SET title = ?, director = ?, trailer = ?, summary = ?, released_date = ?, tags = ? WHERE id = ?",
        )
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(&movie.trailer)
        .bind(&movie.summary)
        .bind(movie.released_date)
        .bind(tags_json(movie)?)
        .bind(movie.id)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>> {
        let row: Option<MovieRow> = sqlx::query_as(&format!("{SELECT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;
        row.map(Movie::try_from).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Movie>> {
        let row: Option<MovieRow> = sqlx::query_as(&format!("{SELECT} WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;
        row.map(Movie::try_from).transpose()
    }

    async fn list(&self, query: &MovieQuery) -> Result<Vec<Movie>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT);
        qb.push(" WHERE 1 = 1");

        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            qb.push(" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR director LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR released_date LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
        if let Some(title) = query.title.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND title LIKE ").push_bind(like_pattern(title)).push(" ESCAPE '\\'");
        }
        if let Some(director) = query.director.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND director LIKE ").push_bind(like_pattern(director)).push(" ESCAPE '\\'");
        }
        if let Some(year) = query.year {
            qb.push(" AND CAST(strftime('%Y', released_date) AS INTEGER) = ").push_bind(year);
        }
        if let Some(tag) = query.tag.as_deref() {
            qb.push(" AND EXISTS (SELECT 1 FROM json_each(movies.tags) WHERE json_each.value = ")
                .push_bind(tag.to_string())
                .push(")");
        }

        qb.push(" ORDER BY ")
            .push(order_column(query.ordering.field))
            .push(if query.ordering.descending { " DESC" } else { " ASC" })
            .push(", slug ASC");

        let rows: Vec<MovieRow> =
            qb.build_query_as().fetch_all(&self.pool).await.map_err(map_err)?;
        rows.into_iter().map(Movie::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::fixtures;
    use domains::{MovieOrdering, UniqueKey};

    async fn seeded() -> SqliteStore {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut matrix = fixtures::movie("The Matrix", 1999);
        matrix.tags = vec!["sci-fi".into(), "action".into()];
        let mut heat = fixtures::movie("Heat", 1995);
        heat.director = "Michael Mann".into();
        heat.tags = vec!["crime".into()];
        let reloaded = fixtures::movie("The Matrix Reloaded", 2003);
        for movie in [matrix, heat, reloaded] {
            MovieRepository::insert(&store, &movie).await.unwrap();
        }
        store
    }

    fn titles(movies: Vec<Movie>) -> Vec<String> {
        movies.into_iter().map(|m| m.title).collect()
    }

    #[tokio::test]
    async fn duplicate_slug_is_reported() {
        let store = SqliteStore::in_memory().await.unwrap();
        MovieRepository::insert(&store, &fixtures::movie("The Matrix", 1999)).await.unwrap();
        let err = MovieRepository::insert(&store, &fixtures::movie("The Matrix", 1999))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Duplicate(UniqueKey::MovieSlug));
    }

    #[tokio::test]
    async fn tags_round_trip() {
        let store = seeded().await;
        let matrix = store.find_by_slug("the-matrix-1999").await.unwrap().unwrap();
        assert_eq!(matrix.tags, ["sci-fi", "action"]);
    }

    #[tokio::test]
    async fn default_order_is_title() {
        let store = seeded().await;
        let all = MovieRepository::list(&store, &MovieQuery::default()).await.unwrap();
        assert_eq!(titles(all), ["Heat", "The Matrix", "The Matrix Reloaded"]);
    }

    #[tokio::test]
    async fn filters_and_ordering() {
        let store = seeded().await;

        let q = MovieQuery { search: Some("matrix".into()), ..Default::default() };
        assert_eq!(titles(MovieRepository::list(&store, &q).await.unwrap()).len(), 2);

        let q = MovieQuery { search: Some("1995".into()), ..Default::default() };
        assert_eq!(titles(MovieRepository::list(&store, &q).await.unwrap()), ["Heat"]);

        let q = MovieQuery { director: Some("mann".into()), ..Default::default() };
        assert_eq!(titles(MovieRepository::list(&store, &q).await.unwrap()), ["Heat"]);

        let q = MovieQuery { year: Some(2003), ..Default::default() };
        assert_eq!(titles(MovieRepository::list(&store, &q).await.unwrap()), ["The Matrix Reloaded"]);

        let q = MovieQuery { tag: Some("action".into()), ..Default::default() };
        assert_eq!(titles(MovieRepository::list(&store, &q).await.unwrap()), ["The Matrix"]);

        let q = MovieQuery { ordering: "-released_date".parse::<MovieOrdering>().unwrap(), ..Default::default() };
        assert_eq!(
            titles(MovieRepository::list(&store, &q).await.unwrap()),
            ["The Matrix Reloaded", "The Matrix", "Heat"]
        );
    }

    #[tokio::test]
    async fn like_wildcards_are_literal() {
        let store = seeded().await;
        let q = MovieQuery { search: Some("%".into()), ..Default::default() };
        assert!(MovieRepository::list(&store, &q).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_leaves_the_slug_alone() {
        let store = seeded().await;
        let mut matrix = store.find_by_slug("the-matrix-1999").await.unwrap().unwrap();
        matrix.title = "The Matrix (Remastered)".into();
        matrix.slug = "something-else".into();
        MovieRepository::update(&store, &matrix).await.unwrap();
        let found = MovieRepository::find_by_id(&store, matrix.id).await.unwrap().unwrap();
        assert_eq!(found.slug, "the-matrix-1999");
        assert_eq!(found.title, "The Matrix (Remastered)");
    }
}
