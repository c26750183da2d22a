use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use domains::{validation, TokenPair};
use serde_json::{json, Value};

use crate::dto::{AccessResponse, LoginRequest, RefreshRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenPair>> {
    let Json(body) = body?;
    let username = validation::required("username", body.username)?;
    let password = validation::required("password", body.password)?;
    Ok(Json(state.services.auth.login(&username, &password).await?))
}

pub async fn refresh(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<AccessResponse>> {
    let Json(body) = body?;
    let refresh = validation::required("refresh", body.refresh)?;
    Ok(Json(AccessResponse { access: state.services.auth.refresh(&refresh)? }))
}

pub async fn logout(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    let refresh = validation::required("refresh", body.refresh)?;
    state.services.auth.logout(&refresh)?;
    Ok(Json(json!({})))
}
