//! Account registration and management.

use std::sync::Arc;

use chrono::Utc;
use domains::validation;
use domains::{
    authorize, Action, Actor, DomainError, EntityKind, PasswordHasher, Result, UniqueKey, User,
    UserRepository,
};
use tracing::info;
use uuid::Uuid;

/// Input of the open registration endpoint.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Input of PUT/PATCH on a single user. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    #[tracing::instrument(skip_all, fields(username = ?input.username))]
    pub async fn register(&self, input: Registration) -> Result<User> {
        let username = validation::required("username", input.username)?;
        let email = validation::required("email", input.email)?;
        let password = validation::required("password", input.password)?;
        validation::username(&username)?;
        validation::email(&email)?;
        validation::password(&password)?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Duplicate(UniqueKey::Username));
        }

        let user = User {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash: self.hasher.hash(&password)?,
            first_name: String::new(),
            last_name: String::new(),
            is_admin: false,
            date_joined: Utc::now(),
        };
        self.users.insert(&user).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.users.list().await
    }

    pub async fn get(&self, username: &str) -> Result<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::User.name(), username))
    }

    /// `full` is PUT semantics: username, email and password must be present.
    #[tracing::instrument(skip(self, actor, changes))]
    pub async fn update(
        &self,
        actor: &Actor,
        username: &str,
        changes: UserChanges,
        full: bool,
    ) -> Result<User> {
        let mut user = self.get(username).await?;
        authorize(actor, EntityKind::User, Action::Update, Some(user.id))?;

        if full {
            validation::required("username", changes.username.as_ref())?;
            validation::required("email", changes.email.as_ref())?;
            validation::required("password", changes.password.as_ref())?;
        }

        if let Some(new_name) = changes.username {
            validation::username(&new_name)?;
            if new_name != user.username {
                if self.users.find_by_username(&new_name).await?.is_some() {
                    return Err(DomainError::Duplicate(UniqueKey::Username));
                }
                user.username = new_name;
            }
        }
        if let Some(email) = changes.email {
            validation::email(&email)?;
            user.email = email;
        }
        if let Some(first_name) = changes.first_name {
            validation::bounded("first_name", &first_name)?;
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            validation::bounded("last_name", &last_name)?;
            user.last_name = last_name;
        }
        if let Some(password) = changes.password {
            validation::password(&password)?;
            user.password_hash = self.hasher.hash(&password)?;
        }

        self.users.update(&user).await?;
        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    #[tracing::instrument(skip(self, actor))]
    pub async fn delete(&self, actor: &Actor, username: &str) -> Result<()> {
        let user = self.get(username).await?;
        authorize(actor, EntityKind::User, Action::Delete, Some(user.id))?;
        self.users.delete(user.id).await?;
        info!(user_id = %user.id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{Identity, MockPasswordHasher, MockUserRepository};

    fn stored(username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.into(),
            email: format!("{username}@example.com"),
            password_hash: "old-hash".into(),
            first_name: String::new(),
            last_name: String::new(),
            is_admin: false,
            date_joined: Utc::now(),
        }
    }

    fn actor_for(user: &User, is_admin: bool) -> Actor {
        Actor::User(Identity { user_id: user.id, username: user.username.clone(), is_admin })
    }

    fn hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().returning(|p| Ok(format!("hashed:{p}")));
        hasher
    }

    #[tokio::test]
    async fn register_hashes_the_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_insert()
            .withf(|u: &User| u.password_hash == "hashed:hunter2" && !u.is_admin)
            .times(1)
            .returning(|_| Ok(()));
        let service = UserService::new(Arc::new(users), Arc::new(hasher()));

        let user = service
            .register(Registration {
                username: Some("trinity".into()),
                email: Some("trinity@zion.io".into()),
                password: Some("hunter2".into()),
            })
            .await
            .unwrap();
        assert_eq!(user.username, "trinity");
        assert_ne!(user.password_hash, "hunter2");
    }

    #[tokio::test]
    async fn register_rejects_taken_usernames() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|name| Ok(Some(stored(name))));
        users.expect_insert().never();
        let service = UserService::new(Arc::new(users), Arc::new(hasher()));

        let err = service
            .register(Registration {
                username: Some("neo".into()),
                email: Some("neo@zion.io".into()),
                password: Some("pw".into()),
            })
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Duplicate(UniqueKey::Username));
    }

    #[tokio::test]
    async fn register_requires_all_fields() {
        let service =
            UserService::new(Arc::new(MockUserRepository::new()), Arc::new(hasher()));
        let err = service
            .register(Registration { username: Some("neo".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "email: This field is required.");
    }

    #[tokio::test]
    async fn strangers_cannot_update_someone_else() {
        let target = stored("morpheus");
        let stranger = stored("cypher");
        let mut users = MockUserRepository::new();
        let found = target.clone();
        users.expect_find_by_username().returning(move |_| Ok(Some(found.clone())));
        users.expect_update().never();
        let service = UserService::new(Arc::new(users), Arc::new(hasher()));

        let err = service
            .update(&actor_for(&stranger, false), "morpheus", UserChanges::default(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn self_update_rehashes_a_new_password() {
        let me = stored("neo");
        let mut users = MockUserRepository::new();
        let found = me.clone();
        users.expect_find_by_username().returning(move |_| Ok(Some(found.clone())));
        users
            .expect_update()
            .withf(|u: &User| u.password_hash == "hashed:redpill" && u.first_name == "Thomas")
            .times(1)
            .returning(|_| Ok(()));
        let service = UserService::new(Arc::new(users), Arc::new(hasher()));

        let changes = UserChanges {
            password: Some("redpill".into()),
            first_name: Some("Thomas".into()),
            ..Default::default()
        };
        let updated = service.update(&actor_for(&me, false), "neo", changes, false).await.unwrap();
        assert_eq!(updated.first_name, "Thomas");
    }

    #[tokio::test]
    async fn put_requires_the_registration_fields() {
        let me = stored("neo");
        let mut users = MockUserRepository::new();
        let found = me.clone();
        users.expect_find_by_username().returning(move |_| Ok(Some(found.clone())));
        let service = UserService::new(Arc::new(users), Arc::new(hasher()));

        let changes = UserChanges { username: Some("neo".into()), ..Default::default() };
        let err = service.update(&actor_for(&me, false), "neo", changes, true).await.unwrap_err();
        assert_eq!(err.to_string(), "email: This field is required.");
    }

    #[tokio::test]
    async fn admins_delete_anyone() {
        let target = stored("cypher");
        let admin = stored("root");
        let target_id = target.id;
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(move |_| Ok(Some(target.clone())));
        users.expect_delete().withf(move |id| *id == target_id).times(1).returning(|_| Ok(()));
        let service = UserService::new(Arc::new(users), Arc::new(hasher()));

        service.delete(&actor_for(&admin, true), "cypher").await.unwrap();
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        let service = UserService::new(Arc::new(users), Arc::new(hasher()));
        let err = service.get("ghost").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));
    }
}
