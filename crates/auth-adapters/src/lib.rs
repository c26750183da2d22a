//! # auth-adapters
//!
//! Implementations of the credential ports: an Argon2 [`PasswordHasher`]
//! and, behind `auth-jwt`, a signed-token [`TokenService`].
//!
//! [`PasswordHasher`]: domains::PasswordHasher
//! [`TokenService`]: domains::TokenService

mod argon;
#[cfg(feature = "auth-jwt")]
mod jwt;

pub use argon::Argon2Hasher;
#[cfg(feature = "auth-jwt")]
pub use jwt::{Claims, JwtTokenService, TokenType};
