//! Movie catalogue. Writes are admin-only; the slug is derived once from
//! title and release year.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use domains::validation;
use domains::{
    authorize, movie_slug, Action, Actor, DomainError, EntityKind, Movie, MovieQuery,
    MovieRepository, Result, ReviewRepository,
};
use tracing::info;
use uuid::Uuid;

/// Movie input. Used for create (all required fields must be set), PUT and
/// PATCH. A client-supplied slug has no field here: slugs are never taken
/// from input.
#[derive(Debug, Clone, Default)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub director: Option<String>,
    pub trailer: Option<String>,
    pub summary: Option<String>,
    pub released_date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

/// A movie with the slugs of its reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub movie: Movie,
    pub review_slugs: Vec<String>,
}

#[derive(Clone)]
pub struct MovieService {
    movies: Arc<dyn MovieRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl MovieService {
    pub fn new(movies: Arc<dyn MovieRepository>, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { movies, reviews }
    }

    pub async fn list(&self, query: &MovieQuery) -> Result<Vec<MovieDetails>> {
        let movies = self.movies.list(query).await?;
        let mut out = Vec::with_capacity(movies.len());
        for movie in movies {
            out.push(self.details(movie).await?);
        }
        Ok(out)
    }

    pub async fn get(&self, slug: &str) -> Result<MovieDetails> {
        let movie = self.find(slug).await?;
        self.details(movie).await
    }

    #[tracing::instrument(skip_all, fields(title = ?input.title))]
    pub async fn create(&self, actor: &Actor, input: MovieChanges) -> Result<MovieDetails> {
        authorize(actor, EntityKind::Movie, Action::Create, None)?;

        let title = validation::required("title", input.title)?;
        validation::title("title", &title)?;
        let slug = movie_slug(&title, input.released_date)?;
        // movie_slug guarantees the date is present
        let released_date = validation::required("released_date", input.released_date)?;

        let movie = Movie {
            id: Uuid::new_v4(),
            title,
            director: checked_director(input.director)?,
            trailer: checked_trailer(input.trailer)?,
            summary: input.summary.unwrap_or_default(),
            released_date,
            slug,
            tags: validation::tags(input.tags.unwrap_or_default())?,
            created_at: Utc::now(),
        };
        self.movies.insert(&movie).await?;
        info!(slug = %movie.slug, "movie created");
        Ok(MovieDetails { movie, review_slugs: Vec::new() })
    }

    /// `full` is PUT semantics: title and released_date must be present.
    /// The slug keeps its creation-time value.
    #[tracing::instrument(skip(self, actor, changes))]
    pub async fn update(
        &self,
        actor: &Actor,
        slug: &str,
        changes: MovieChanges,
        full: bool,
    ) -> Result<MovieDetails> {
        let mut movie = self.find(slug).await?;
        authorize(actor, EntityKind::Movie, Action::Update, None)?;

        if full {
            validation::required("title", changes.title.as_ref())?;
            validation::required("released_date", changes.released_date)?;
        }
        if let Some(title) = changes.title {
            validation::title("title", &title)?;
            movie.title = title;
        }
        if let Some(released_date) = changes.released_date {
            movie.released_date = released_date;
        }
        if changes.director.is_some() || full {
            movie.director = checked_director(changes.director)?;
        }
        if changes.trailer.is_some() || full {
            movie.trailer = checked_trailer(changes.trailer)?;
        }
        if changes.summary.is_some() || full {
            movie.summary = changes.summary.unwrap_or_default();
        }
        if let Some(tags) = changes.tags {
            movie.tags = validation::tags(tags)?;
        }

        self.movies.update(&movie).await?;
        info!(slug = %movie.slug, "movie updated");
        self.details(movie).await
    }

    #[tracing::instrument(skip(self, actor))]
    pub async fn delete(&self, actor: &Actor, slug: &str) -> Result<()> {
        let movie = self.find(slug).await?;
        authorize(actor, EntityKind::Movie, Action::Delete, None)?;
        self.movies.delete(movie.id).await?;
        info!(slug = %movie.slug, "movie deleted");
        Ok(())
    }

    async fn find(&self, slug: &str) -> Result<Movie> {
        self.movies
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Movie.name(), slug))
    }

    async fn details(&self, movie: Movie) -> Result<MovieDetails> {
        let review_slugs =
            self.reviews.list_by_movie(movie.id).await?.into_iter().map(|r| r.slug).collect();
        Ok(MovieDetails { movie, review_slugs })
    }
}

fn checked_director(director: Option<String>) -> Result<String> {
    let director = director.unwrap_or_default();
    validation::bounded("director", &director)?;
    Ok(director)
}

/// Empty trailer input clears the field.
fn checked_trailer(trailer: Option<String>) -> Result<Option<String>> {
    match trailer.filter(|t| !t.is_empty()) {
        Some(url) => {
            validation::url("trailer", &url)?;
            Ok(Some(url))
        }
        None => Ok(None),
    }
}
