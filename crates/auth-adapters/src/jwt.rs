//! HS256 access/refresh tokens with an in-process revocation list.
//!
//! Access tokens are short lived and never revoked; logout revokes the
//! refresh token's `jti`. Revoked ids are forgotten once the token would
//! have expired anyway.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use domains::{DomainError, Result, TokenPair, TokenService};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

const INVALID_ACCESS: &str = "Given token not valid for any token type";
const INVALID_REFRESH: &str = "Token is invalid or expired";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub jti: Uuid,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    /// Revoked refresh `jti` -> its `exp`.
    revoked: DashMap<Uuid, i64>,
}

impl JwtTokenService {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            access_ttl,
            refresh_ttl,
            revoked: DashMap::new(),
        }
    }

    fn sign(&self, user_id: Uuid, token_type: TokenType) -> Result<String> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id,
            jti: Uuid::new_v4(),
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("JWT encode failed: {e}")))
    }

    /// Signature, expiry and type check. `None` on any failure.
    fn claims(&self, token: &str, expected: TokenType) -> Option<Claims> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| debug!(error = %e, "token rejected"))
            .ok()?;
        (claims.token_type == expected).then_some(claims)
    }

    fn live_refresh(&self, token: &str) -> Result<Claims> {
        self.claims(token, TokenType::Refresh)
            .filter(|c| !self.revoked.contains_key(&c.jti))
            .ok_or_else(|| DomainError::Unauthenticated(INVALID_REFRESH.into()))
    }

    fn purge_expired(&self) {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, exp| *exp > now);
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: Uuid) -> Result<TokenPair> {
        Ok(TokenPair {
            access: self.sign(user_id, TokenType::Access)?,
            refresh: self.sign(user_id, TokenType::Refresh)?,
        })
    }

    fn verify_access(&self, token: &str) -> Result<Uuid> {
        self.claims(token, TokenType::Access)
            .map(|c| c.sub)
            .ok_or_else(|| DomainError::Unauthenticated(INVALID_ACCESS.into()))
    }

    fn refresh(&self, refresh_token: &str) -> Result<String> {
        let claims = self.live_refresh(refresh_token)?;
        self.sign(claims.sub, TokenType::Access)
    }

    fn revoke(&self, refresh_token: &str) -> Result<()> {
        let claims = self.live_refresh(refresh_token)?;
        self.purge_expired();
        self.revoked.insert(claims.jti, claims.exp);
        Ok(())
    }
}
