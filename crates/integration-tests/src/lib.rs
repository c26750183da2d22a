//! Shared harness for the HTTP tests: the full router over an in-memory
//! store, with the real password hasher and token service.

use std::sync::Arc;

use api_adapters::AppState;
use auth_adapters::{Argon2Hasher, JwtTokenService};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use domains::{PasswordHasher, User, UserRepository};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use services::{Ports, Services};
use storage_adapters::SqliteStore;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(SqliteStore::in_memory().await.expect("in-memory store"));
        let tokens =
            JwtTokenService::new("integration-secret", Duration::seconds(300), Duration::seconds(3600));
        let services = Services::new(Ports {
            users: store.clone(),
            movies: store.clone(),
            reviews: store.clone(),
            comments: store.clone(),
            likes: store.clone(),
            hasher: Arc::new(Argon2Hasher::new()),
            tokens: Arc::new(tokens),
        });
        Self { router: api_adapters::router(AppState::new(services)), store }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Logs in and returns the access token.
    pub async fn login(&self, username: &str) -> String {
        let (status, body) =
            self.post("/api/login/", None, json!({ "username": username, "password": PASSWORD })).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access"].as_str().expect("access token").to_string()
    }

    /// Registers through the API and returns an access token.
    pub async fn user(&self, username: &str) -> String {
        let (status, body) = self
            .post(
                "/api/users/register/",
                None,
                json!({ "username": username, "email": format!("{username}@zion.io"), "password": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
        self.login(username).await
    }

    /// Inserts an administrator directly and returns an access token.
    pub async fn admin(&self, username: &str) -> String {
        let admin = User {
            id: Uuid::new_v4(),
            username: username.into(),
            email: format!("{username}@zion.io"),
            password_hash: Argon2Hasher::new().hash(PASSWORD).expect("hash"),
            first_name: String::new(),
            last_name: String::new(),
            is_admin: true,
            date_joined: Utc::now(),
        };
        UserRepository::insert(self.store.as_ref(), &admin).await.expect("insert admin");
        self.login(username).await
    }

    /// Creates a movie as `admin` and returns its slug.
    pub async fn movie(&self, admin: &str, title: &str, released_date: &str) -> String {
        let (status, body) = self
            .post(
                "/api/movies/",
                Some(admin),
                json!({ "title": title, "director": "The Wachowskis", "released_date": released_date }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "movie creation failed: {body}");
        body["slug"].as_str().expect("slug").to_string()
    }

    /// Reviews a movie and returns the review slug.
    pub async fn review(&self, token: &str, movie: &str, rating: i64) -> String {
        let (status, body) = self
            .post("/api/reviews/", Some(token), json!({ "movie": movie, "body": "Whoa.", "rating": rating }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "review creation failed: {body}");
        body["slug"].as_str().expect("slug").to_string()
    }

    pub async fn like(&self, token: &str, review: &str) -> String {
        let (status, body) = self.post("/api/likes/", Some(token), json!({ "review": review })).await;
        assert_eq!(status, StatusCode::CREATED, "like failed: {body}");
        body["slug"].as_str().expect("slug").to_string()
    }
}
