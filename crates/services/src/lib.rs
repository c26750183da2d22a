//! # services
//!
//! Use cases of the review site. Each service composes the domain ports;
//! none of them knows about HTTP or SQL.

pub mod auth;
pub mod comments;
pub mod likes;
mod lookup;
pub mod movies;
pub mod reviews;
pub mod users;

use std::sync::Arc;

use domains::{
    CommentRepository, LikeRepository, MovieRepository, PasswordHasher, ReviewRepository,
    TokenService, UserRepository,
};

pub use auth::AuthService;
pub use comments::{CommentChanges, CommentDetails, CommentService};
pub use likes::{LikeChanges, LikeDetails, LikeService};
pub use movies::{MovieChanges, MovieDetails, MovieService};
pub use reviews::{ReviewChanges, ReviewDetails, ReviewService};
pub use users::{Registration, UserChanges, UserService};

/// Every adapter the services need, as trait objects.
#[derive(Clone)]
pub struct Ports {
    pub users: Arc<dyn UserRepository>,
    pub movies: Arc<dyn MovieRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
}

/// The full set of use cases, cheap to clone into request handlers.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub movies: MovieService,
    pub reviews: ReviewService,
    pub comments: CommentService,
    pub likes: LikeService,
}

impl Services {
    pub fn new(ports: Ports) -> Self {
        Self {
            auth: AuthService::new(ports.users.clone(), ports.hasher.clone(), ports.tokens.clone()),
            users: UserService::new(ports.users.clone(), ports.hasher.clone()),
            movies: MovieService::new(ports.movies.clone(), ports.reviews.clone()),
            reviews: ReviewService::new(
                ports.users.clone(),
                ports.movies.clone(),
                ports.reviews.clone(),
                ports.comments.clone(),
                ports.likes.clone(),
            ),
            comments: CommentService::new(
                ports.users.clone(),
                ports.reviews.clone(),
                ports.comments.clone(),
            ),
            likes: LikeService::new(ports.users, ports.reviews, ports.likes),
        }
    }
}
