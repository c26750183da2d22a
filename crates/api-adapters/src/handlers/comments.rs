use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::dto::{self, CommentRequest, CommentResponse};
use crate::error::ApiResult;
use crate::extract::CurrentActor;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<CommentResponse>>> {
    Ok(Json(dto::all(state.services.comments.list().await?)))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    let Json(body) = body?;
    let comment = state.services.comments.create(&actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<CommentResponse>> {
    Ok(Json(state.services.comments.get(&slug).await?.into()))
}

pub async fn replace(
    state: State<AppState>,
    actor: CurrentActor,
    slug: Path<String>,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult<Json<CommentResponse>> {
    update(state, actor, slug, body, true).await
}

pub async fn patch(
    state: State<AppState>,
    actor: CurrentActor,
    slug: Path<String>,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult<Json<CommentResponse>> {
    update(state, actor, slug, body, false).await
}

async fn update(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(slug): Path<String>,
    body: Result<Json<CommentRequest>, JsonRejection>,
    full: bool,
) -> ApiResult<Json<CommentResponse>> {
    let Json(body) = body?;
    let comment = state.services.comments.update(&actor, &slug, body.into(), full).await?;
    Ok(Json(comment.into()))
}

pub async fn destroy(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    state.services.comments.delete(&actor, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
