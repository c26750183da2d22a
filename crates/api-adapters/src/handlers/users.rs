use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::dto::{self, RegisterRequest, RegisteredUser, UserRequest, UserResponse};
use crate::error::ApiResult;
use crate::extract::CurrentActor;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    Ok(Json(dto::all(state.services.users.list().await?)))
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisteredUser>)> {
    let Json(body) = body?;
    let user = state.services.users.register(body.into()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    Ok(Json(state.services.users.get(&username).await?.into()))
}

pub async fn replace(
    state: State<AppState>,
    actor: CurrentActor,
    username: Path<String>,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    update(state, actor, username, body, true).await
}

pub async fn patch(
    state: State<AppState>,
    actor: CurrentActor,
    username: Path<String>,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    update(state, actor, username, body, false).await
}

async fn update(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(username): Path<String>,
    body: Result<Json<UserRequest>, JsonRejection>,
    full: bool,
) -> ApiResult<Json<UserResponse>> {
    let Json(body) = body?;
    let user = state.services.users.update(&actor, &username, body.into(), full).await?;
    Ok(Json(user.into()))
}

pub async fn destroy(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    state.services.users.delete(&actor, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}
