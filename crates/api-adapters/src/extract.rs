//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domains::{Actor, DomainError};

use crate::error::ApiError;
use crate::state::AppState;

/// The acting identity of a request.
///
/// No `Authorization` header (or a non-bearer scheme) is an anonymous actor.
/// A bearer token that fails verification, or whose user no longer exists,
/// rejects the request with 401. Only write handlers take this extractor, so
/// reads never look at the header.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(CurrentActor(Actor::Anonymous));
        };
        let header = header.to_str().map_err(|_| {
            DomainError::Unauthenticated("Invalid Authorization header.".into())
        })?;

        let mut words = header.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
                let identity = state.services.auth.authenticate(token).await?;
                Ok(CurrentActor(Actor::User(identity)))
            }
            (Some(scheme), _, _) if scheme.eq_ignore_ascii_case("bearer") => Err(DomainError::Unauthenticated(
                "Authorization header must contain two space-delimited values".into(),
            )
            .into()),
            _ => Ok(CurrentActor(Actor::Anonymous)),
        }
    }
}
