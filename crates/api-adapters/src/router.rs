use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::ErrorBody;
use crate::handlers::{auth, comments, likes, movies, reviews, users};
use crate::metrics;
use crate::middleware;
use crate::state::AppState;

/// Assembles every route of the site.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/login/", post(auth::login))
        .route("/api/token/refresh/", post(auth::refresh))
        .route("/api/logout/", post(auth::logout))
        .route("/api/users/", get(users::list))
        .route("/api/users/register/", post(users::register))
        .route(
            "/api/user/{username}/",
            get(users::retrieve).put(users::replace).patch(users::patch).delete(users::destroy),
        )
        .route("/api/movies/", get(movies::list).post(movies::create))
        .route(
            "/api/movie/{slug}/",
            get(movies::retrieve).put(movies::replace).patch(movies::patch).delete(movies::destroy),
        )
        .route("/api/movie/{slug}/reviews/", get(movies::most_liked_reviews))
        .route("/api/reviews/", get(reviews::list).post(reviews::create))
        .route(
            "/api/review/{slug}/",
            get(reviews::retrieve).put(reviews::replace).patch(reviews::patch).delete(reviews::destroy),
        )
        .route("/api/comments/", get(comments::list).post(comments::create))
        .route(
            "/api/comment/{slug}/",
            get(comments::retrieve)
                .put(comments::replace)
                .patch(comments::patch)
                .delete(comments::destroy),
        )
        .route("/api/likes/", get(likes::list).post(likes::create))
        .route(
            "/api/like/{slug}/",
            get(likes::retrieve).put(likes::replace).patch(likes::patch).delete(likes::destroy),
        )
        .route_layer(from_fn_with_state(state.clone(), metrics::track));

    let app = api.route("/metrics", get(metrics::metrics_handler)).fallback(not_found);
    middleware::apply(app).with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody { code: "not_found", detail: "Not found.".into() }),
    )
}
