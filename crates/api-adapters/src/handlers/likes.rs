use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::dto::{self, LikeRequest, LikeResponse};
use crate::error::ApiResult;
use crate::extract::CurrentActor;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<LikeResponse>>> {
    Ok(Json(dto::all(state.services.likes.list().await?)))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    body: Result<Json<LikeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LikeResponse>)> {
    let Json(body) = body?;
    let like = state.services.likes.create(&actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(like.into())))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<LikeResponse>> {
    Ok(Json(state.services.likes.get(&slug).await?.into()))
}

pub async fn replace(
    state: State<AppState>,
    actor: CurrentActor,
    slug: Path<String>,
    body: Result<Json<LikeRequest>, JsonRejection>,
) -> ApiResult<Json<LikeResponse>> {
    update(state, actor, slug, body, true).await
}

pub async fn patch(
    state: State<AppState>,
    actor: CurrentActor,
    slug: Path<String>,
    body: Result<Json<LikeRequest>, JsonRejection>,
) -> ApiResult<Json<LikeResponse>> {
    update(state, actor, slug, body, false).await
}

async fn update(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(slug): Path<String>,
    body: Result<Json<LikeRequest>, JsonRejection>,
    full: bool,
) -> ApiResult<Json<LikeResponse>> {
    let Json(body) = body?;
    let like = state.services.likes.update(&actor, &slug, body.into(), full).await?;
    Ok(Json(like.into()))
}

pub async fn destroy(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    state.services.likes.delete(&actor, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
