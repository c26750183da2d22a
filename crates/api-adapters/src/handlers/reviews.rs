use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::dto::{self, ReviewRequest, ReviewResponse};
use crate::error::ApiResult;
use crate::extract::CurrentActor;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ReviewResponse>>> {
    Ok(Json(dto::all(state.services.reviews.list().await?)))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ReviewResponse>)> {
    let Json(body) = body?;
    let review = state.services.reviews.create(&actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(review.into())))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ReviewResponse>> {
    Ok(Json(state.services.reviews.get(&slug).await?.into()))
}

pub async fn replace(
    state: State<AppState>,
    actor: CurrentActor,
    slug: Path<String>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<Json<ReviewResponse>> {
    update(state, actor, slug, body, true).await
}

pub async fn patch(
    state: State<AppState>,
    actor: CurrentActor,
    slug: Path<String>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<Json<ReviewResponse>> {
    update(state, actor, slug, body, false).await
}

async fn update(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(slug): Path<String>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
    full: bool,
) -> ApiResult<Json<ReviewResponse>> {
    let Json(body) = body?;
    let review = state.services.reviews.update(&actor, &slug, body.into(), full).await?;
    Ok(Json(review.into()))
}

pub async fn destroy(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    state.services.reviews.delete(&actor, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
