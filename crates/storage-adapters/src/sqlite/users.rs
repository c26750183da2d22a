use async_trait::async_trait;
use domains::{Result, User, UserRepository};
use uuid::Uuid;

use super::rows::UserRow;
use super::{map_err, SqliteStore};

const COLUMNS: &str =
    "id, username, email, password_hash, first_name, last_name, is_admin, date_joined";

#[async_trait]
impl UserRepository for SqliteStore {
    async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, first_name, last_name, is_admin, date_joined) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_admin)
        .bind(user.date_joined)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            "UPDATE users SET username = ?, email = ?, password_hash = ?, first_name = ?, last_name = ?, is_admin = ? WHERE id = ?",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_admin)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_err)?;
        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE username = ?"))
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_err)?;
        Ok(row.map(User::from))
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM users ORDER BY username"))
                .fetch_all(&self.pool)
                .await
                .map_err(map_err)?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::fixtures;
    use domains::{DomainError, UniqueKey};

    #[tokio::test]
    async fn round_trips_and_keeps_usernames_unique() {
        let store = SqliteStore::in_memory().await.unwrap();
        let neo = fixtures::user("neo");
        UserRepository::insert(&store, &neo).await.unwrap();

        let found = store.find_by_username("neo").await.unwrap().unwrap();
        assert_eq!(found.id, neo.id);
        assert_eq!(found.password_hash, neo.password_hash);

        let err = UserRepository::insert(&store, &fixtures::user("neo")).await.unwrap_err();
        assert_eq!(err, DomainError::Duplicate(UniqueKey::Username));
    }

    #[tokio::test]
    async fn update_and_delete() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut neo = fixtures::user("neo");
        UserRepository::insert(&store, &neo).await.unwrap();

        neo.username = "the-one".into();
        neo.is_admin = true;
        UserRepository::update(&store, &neo).await.unwrap();
        let found = UserRepository::find_by_id(&store, neo.id).await.unwrap().unwrap();
        assert_eq!(found.username, "the-one");
        assert!(found.is_admin);

        UserRepository::delete(&store, neo.id).await.unwrap();
        assert!(UserRepository::find_by_id(&store, neo.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_ordered_by_username() {
        let store = SqliteStore::in_memory().await.unwrap();
        for name in ["trinity", "morpheus", "neo"] {
            UserRepository::insert(&store, &fixtures::user(name)).await.unwrap();
        }
        let names: Vec<String> =
            UserRepository::list(&store).await.unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(names, ["morpheus", "neo", "trinity"]);
    }
}
