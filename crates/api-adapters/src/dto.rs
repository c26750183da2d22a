//! Wire shapes. Inputs are all-optional so that PUT/PATCH share one type and
//! missing fields surface as field-level validation errors, not parse errors.

use chrono::{DateTime, NaiveDate, Utc};
use domains::{DomainError, MovieQuery, User};
use serde::{Deserialize, Serialize};
use services::{
    CommentChanges, CommentDetails, LikeChanges, LikeDetails, MovieChanges, MovieDetails,
    Registration, ReviewChanges, ReviewDetails, UserChanges,
};

use crate::links;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub access: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(r: RegisterRequest) -> Self {
        Registration { username: r.username, email: r.email, password: r.password }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub url: String,
    pub email: String,
    pub username: String,
}

impl From<User> for RegisteredUser {
    fn from(u: User) -> Self {
        RegisteredUser { url: links::user(&u.username), email: u.email, username: u.username }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<UserRequest> for UserChanges {
    fn from(r: UserRequest) -> Self {
        UserChanges {
            username: r.username,
            email: r.email,
            password: r.password,
            first_name: r.first_name,
            last_name: r.last_name,
        }
    }
}

/// Outward user representation. There is no password field to leak.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub url: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            url: links::user(&u.username),
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

// ---------------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct MovieListParams {
    pub search: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub year: Option<String>,
    pub tag: Option<String>,
    pub ordering: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<MovieListParams> for MovieQuery {
    type Error = DomainError;

    fn try_from(p: MovieListParams) -> Result<Self, Self::Error> {
        let year = match non_empty(p.year) {
            Some(y) => Some(
                y.trim()
                    .parse::<i32>()
                    .map_err(|_| DomainError::validation("year: Enter a number."))?,
            ),
            None => None,
        };
        let ordering = match non_empty(p.ordering) {
            Some(o) => o.trim().parse()?,
            None => Default::default(),
        };
        Ok(MovieQuery {
            search: non_empty(p.search),
            title: non_empty(p.title),
            director: non_empty(p.director),
            year,
            tag: non_empty(p.tag),
            ordering,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MovieRequest {
    pub title: Option<String>,
    pub director: Option<String>,
    pub trailer: Option<String>,
    pub summary: Option<String>,
    pub released_date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

impl From<MovieRequest> for MovieChanges {
    fn from(r: MovieRequest) -> Self {
        MovieChanges {
            title: r.title,
            director: r.director,
            trailer: r.trailer,
            summary: r.summary,
            released_date: r.released_date,
            tags: r.tags,
        }
    }
}

/// Tags are accepted on input but not rendered.
#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub url: String,
    pub title: String,
    pub director: String,
    pub trailer: Option<String>,
    pub summary: String,
    pub released_date: NaiveDate,
    pub reviews: Vec<String>,
    pub slug: String,
}

impl From<MovieDetails> for MovieResponse {
    fn from(d: MovieDetails) -> Self {
        let m = d.movie;
        MovieResponse {
            url: links::movie(&m.slug),
            title: m.title,
            director: m.director,
            trailer: m.trailer,
            summary: m.summary,
            released_date: m.released_date,
            reviews: d.review_slugs.iter().map(|s| links::review(s)).collect(),
            slug: m.slug,
        }
    }
}

// ---------------------------------------------------------------------------
// Reviews, comments, likes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// Movie slug or movie link.
    pub movie: Option<String>,
    pub body: Option<String>,
    pub rating: Option<i64>,
}

impl From<ReviewRequest> for ReviewChanges {
    fn from(r: ReviewRequest) -> Self {
        ReviewChanges {
            movie: r.movie.map(|m| links::slug_from("movie", &m)),
            body: r.body,
            rating: r.rating,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub url: String,
    pub slug: String,
    pub author: String,
    pub author_username: String,
    pub movie: String,
    pub body: String,
    pub rating: u8,
    pub comments: Vec<String>,
    pub likes: Vec<String>,
    pub likes_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReviewDetails> for ReviewResponse {
    fn from(d: ReviewDetails) -> Self {
        let likes_count = d.likes_count();
        let r = d.review;
        ReviewResponse {
            url: links::review(&r.slug),
            slug: r.slug,
            author: links::user(&d.author_username),
            author_username: d.author_username,
            movie: links::movie(&d.movie_slug),
            body: r.body,
            rating: r.rating,
            comments: d.comment_slugs.iter().map(|s| links::comment(s)).collect(),
            likes: d.like_slugs.iter().map(|s| links::like(s)).collect(),
            likes_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    /// Review slug or review link.
    pub review: Option<String>,
    pub body: Option<String>,
}

impl From<CommentRequest> for CommentChanges {
    fn from(r: CommentRequest) -> Self {
        CommentChanges { review: r.review.map(|v| links::slug_from("review", &v)), body: r.body }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub url: String,
    pub slug: String,
    pub author: String,
    pub author_username: String,
    pub review: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentDetails> for CommentResponse {
    fn from(d: CommentDetails) -> Self {
        let c = d.comment;
        CommentResponse {
            url: links::comment(&c.slug),
            slug: c.slug,
            author: links::user(&d.author_username),
            author_username: d.author_username,
            review: links::review(&d.review_slug),
            body: c.body,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub review: Option<String>,
}

impl From<LikeRequest> for LikeChanges {
    fn from(r: LikeRequest) -> Self {
        LikeChanges { review: r.review.map(|v| links::slug_from("review", &v)) }
    }
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub url: String,
    pub slug: String,
    pub author: String,
    pub author_username: String,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

impl From<LikeDetails> for LikeResponse {
    fn from(d: LikeDetails) -> Self {
        let l = d.like;
        LikeResponse {
            url: links::like(&l.slug),
            slug: l.slug,
            author: links::user(&d.author_username),
            author_username: d.author_username,
            review: links::review(&d.review_slug),
            created_at: l.created_at,
        }
    }
}

/// Converts a list of service results into wire shapes.
pub fn all<T, U: From<T>>(items: Vec<T>) -> Vec<U> {
    items.into_iter().map(U::from).collect()
}
