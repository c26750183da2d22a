use axum::http::StatusCode;
use integration_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn admin_creates_a_movie_with_a_derived_slug() {
    let app = TestApp::new().await;
    let admin = app.admin("architect").await;

    let (status, body) = app
        .post(
            "/api/movies/",
            Some(&admin),
            json!({
                "title": "The Matrix",
                "director": "The Wachowskis",
                "released_date": "1999-03-31",
                "tags": ["sci-fi"],
                "slug": "ignored",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["slug"], "the-matrix-1999");
    assert_eq!(body["url"], "/api/movie/the-matrix-1999/");
    assert_eq!(body["reviews"], json!([]));
    assert!(body.get("tags").is_none());
}

#[tokio::test]
async fn missing_release_date_cannot_be_slugged() {
    let app = TestApp::new().await;
    let admin = app.admin("architect").await;
    let (status, body) = app.post("/api/movies/", Some(&admin), json!({ "title": "Untitled" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Released date is required to generate the slug.");
}

#[tokio::test]
async fn same_title_and_year_collide() {
    let app = TestApp::new().await;
    let admin = app.admin("architect").await;
    app.movie(&admin, "The Matrix", "1999-03-31").await;

    let (status, body) = app
        .post("/api/movies/", Some(&admin), json!({ "title": "The Matrix", "released_date": "1999-12-01" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "A movie with this title and release year already exists.");
}

#[tokio::test]
async fn only_admins_write_movies() {
    let app = TestApp::new().await;
    let admin = app.admin("architect").await;
    let neo = app.user("neo").await;
    let payload = json!({ "title": "The Matrix", "released_date": "1999-03-31" });

    let (status, _) = app.post("/api/movies/", None, payload.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.post("/api/movies/", Some(&neo), payload).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let slug = app.movie(&admin, "The Matrix", "1999-03-31").await;
    let uri = format!("/api/movie/{slug}/");
    let (status, _) = app.patch(&uri, Some(&neo), json!({ "summary": "Red pill" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&uri, Some(&neo)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_keeps_the_slug() {
    let app = TestApp::new().await;
    let admin = app.admin("architect").await;
    let slug = app.movie(&admin, "The Matrix", "1999-03-31").await;

    let (status, body) = app
        .put(
            &format!("/api/movie/{slug}/"),
            Some(&admin),
            json!({ "title": "The Matrix Reloaded", "released_date": "2003-05-15" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "The Matrix Reloaded");
    assert_eq!(body["slug"], "the-matrix-1999");

    let (status, _) = app.put(&format!("/api/movie/{slug}/"), Some(&admin), json!({ "summary": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_filters_searches_and_orders() {
    let app = TestApp::new().await;
    let admin = app.admin("architect").await;
    for (title, date, tags) in [
        ("The Matrix", "1999-03-31", json!(["sci-fi"])),
        ("Heat", "1995-12-15", json!(["crime"])),
        ("The Matrix Reloaded", "2003-05-15", json!(["sci-fi", "sequel"])),
    ] {
        let (status, _) = app
            .post("/api/movies/", Some(&admin), json!({ "title": title, "released_date": date, "tags": tags }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let titles = |body: serde_json::Value| -> Vec<String> {
        body.as_array().unwrap().iter().map(|m| m["title"].as_str().unwrap().to_string()).collect()
    };

    let (_, body) = app.get("/api/movies/", None).await;
    assert_eq!(titles(body), ["Heat", "The Matrix", "The Matrix Reloaded"]);

    let (_, body) = app.get("/api/movies/?search=MATRIX", None).await;
    assert_eq!(titles(body).len(), 2);

    let (_, body) = app.get("/api/movies/?year=1995", None).await;
    assert_eq!(titles(body), ["Heat"]);

    let (_, body) = app.get("/api/movies/?tag=sequel", None).await;
    assert_eq!(titles(body), ["The Matrix Reloaded"]);

    let (_, body) = app.get("/api/movies/?ordering=-released_date", None).await;
    assert_eq!(titles(body), ["The Matrix Reloaded", "The Matrix", "Heat"]);

    let (status, _) = app.get("/api/movies/?ordering=rating", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_movie_is_404() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/movie/no-such-movie-2000/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No Movie matches the given query.");
}

#[tokio::test]
async fn malformed_date_is_a_bad_request() {
    let app = TestApp::new().await;
    let admin = app.admin("architect").await;
    let (status, body) = app
        .post("/api/movies/", Some(&admin), json!({ "title": "The Matrix", "released_date": "last year" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "parse_error");
}
