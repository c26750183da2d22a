use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domains::MovieQuery;

use crate::dto::{self, MovieListParams, MovieRequest, MovieResponse, ReviewResponse};
use crate::error::ApiResult;
use crate::extract::CurrentActor;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<MovieListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<MovieResponse>>> {
    let Query(params) = params?;
    let query = MovieQuery::try_from(params)?;
    Ok(Json(dto::all(state.services.movies.list(&query).await?)))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    body: Result<Json<MovieRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MovieResponse>)> {
    let Json(body) = body?;
    let movie = state.services.movies.create(&actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(movie.into())))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<MovieResponse>> {
    Ok(Json(state.services.movies.get(&slug).await?.into()))
}

pub async fn replace(
    state: State<AppState>,
    actor: CurrentActor,
    slug: Path<String>,
    body: Result<Json<MovieRequest>, JsonRejection>,
) -> ApiResult<Json<MovieResponse>> {
    update(state, actor, slug, body, true).await
}

pub async fn patch(
    state: State<AppState>,
    actor: CurrentActor,
    slug: Path<String>,
    body: Result<Json<MovieRequest>, JsonRejection>,
) -> ApiResult<Json<MovieResponse>> {
    update(state, actor, slug, body, false).await
}

async fn update(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(slug): Path<String>,
    body: Result<Json<MovieRequest>, JsonRejection>,
    full: bool,
) -> ApiResult<Json<MovieResponse>> {
    let Json(body) = body?;
    let movie = state.services.movies.update(&actor, &slug, body.into(), full).await?;
    Ok(Json(movie.into()))
}

pub async fn destroy(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    state.services.movies.delete(&actor, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reviews of one movie, most liked first.
pub async fn most_liked_reviews(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Vec<ReviewResponse>>> {
    Ok(Json(dto::all(state.services.reviews.most_liked(&slug).await?)))
}
