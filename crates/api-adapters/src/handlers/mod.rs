//! Route handlers, one module per resource.
//!
//! Collection routes answer GET (list) and POST (create); item routes answer
//! GET, PUT (full update), PATCH (partial update) and DELETE.

pub mod auth;
pub mod comments;
pub mod likes;
pub mod movies;
pub mod reviews;
pub mod users;
