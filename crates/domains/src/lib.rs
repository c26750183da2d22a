//! mins/crates/domains/src/lib.rs
//!
//! The central domain logic and interface definitions for the movie-review
//! backend. Nothing in here performs I/O: storage, hashing and tokens are
//! reached through the port traits in [`ports`].

pub mod error;
pub mod models;
pub mod policy;
pub mod ports;
pub mod ranking;
pub mod slug;
pub mod validation;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use policy::{authorize, decide, Action, Actor, Decision, EntityKind, Identity};
pub use ports::*;
pub use ranking::{rank_by_likes, RankedReview};
pub use slug::{movie_slug, slugify, suffixed_slug};
