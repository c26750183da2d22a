//! Login, token refresh and logout, plus resolving a bearer token to an actor.

use std::sync::Arc;

use domains::{
    DomainError, Identity, PasswordHasher, Result, TokenPair, TokenService, UserRepository,
};
use tracing::{debug, info};

const BAD_CREDENTIALS: &str = "No active account found with the given credentials";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self { users, hasher, tokens }
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .filter(|u| self.hasher.verify(password, &u.password_hash))
            .ok_or_else(|| DomainError::Unauthenticated(BAD_CREDENTIALS.into()))?;
        let pair = self.tokens.issue(user.id)?;
        info!(user_id = %user.id, "login");
        Ok(pair)
    }

    pub fn refresh(&self, refresh_token: &str) -> Result<String> {
        self.tokens.refresh(refresh_token)
    }

    pub fn logout(&self, refresh_token: &str) -> Result<()> {
        self.tokens.revoke(refresh_token)?;
        debug!("refresh token revoked");
        Ok(())
    }

    /// Resolves an access token. The user is re-read on every call so a
    /// deleted account stops working and admin rights are current.
    pub async fn authenticate(&self, access_token: &str) -> Result<Identity> {
        let user_id = self.tokens.verify_access(access_token)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthenticated("User not found".into()))?;
        Ok(Identity { user_id: user.id, username: user.username, is_admin: user.is_admin })
    }
}
