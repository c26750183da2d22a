use axum::http::StatusCode;
use integration_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn comments_link_back_to_their_review() {
    let app = TestApp::new().await;
    let admin = app.admin("architect").await;
    let neo = app.user("neo").await;
    let trinity = app.user("trinity").await;
    let movie = app.movie(&admin, "The Matrix", "1999-03-31").await;
    let review = app.review(&neo, &movie, 5).await;

    let (status, body) = app
        .post(
            "/api/comments/",
            Some(&trinity),
            json!({ "review": format!("http://localhost:8000/api/review/{review}/"), "body": "Agreed." }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["review"], format!("/api/review/{review}/"));
    assert_eq!(body["author_username"], "trinity");
    let comment = body["slug"].as_str().unwrap().to_string();
    assert!(comment.starts_with("comment-trinity-"));

    let (_, review_body) = app.get(&format!("/api/review/{review}/"), None).await;
    assert_eq!(review_body["comments"], json!([format!("/api/comment/{comment}/")]));

    // one author may comment more than once
    let (status, _) =
        app.post("/api/comments/", Some(&trinity), json!({ "review": review, "body": "Also." })).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, all) = app.get("/api/comments/", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn blank_comment_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin("architect").await;
    let neo = app.user("neo").await;
    let movie = app.movie(&admin, "The Matrix", "1999-03-31").await;
    let review = app.review(&neo, &movie, 5).await;

    let (status, _) = app.post("/api/comments/", Some(&neo), json!({ "review": review, "body": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) =
        app.post("/api/comments/", Some(&neo), json!({ "review": "nope", "body": "hi" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "review: Invalid hyperlink - Object does not exist.");
}

#[tokio::test]
async fn liking_twice_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin("architect").await;
    let neo = app.user("neo").await;
    let trinity = app.user("trinity").await;
    let movie = app.movie(&admin, "The Matrix", "1999-03-31").await;
    let review = app.review(&neo, &movie, 5).await;

    let like = app.like(&trinity, &review).await;
    let (status, body) = app.post("/api/likes/", Some(&trinity), json!({ "review": review })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "You have already liked this post");

    let (_, review_body) = app.get(&format!("/api/review/{review}/"), None).await;
    assert_eq!(review_body["likes_count"], 1);
    assert_eq!(review_body["likes"], json!([format!("/api/like/{like}/")]));
}

#[tokio::test]
async fn unliking_allows_liking_again() {
    let app = TestApp::new().await;
    let admin = app.admin("architect").await;
    let neo = app.user("neo").await;
    let trinity = app.user("trinity").await;
    let movie = app.movie(&admin, "The Matrix", "1999-03-31").await;
    let review = app.review(&neo, &movie, 5).await;

    let like = app.like(&trinity, &review).await;
    let (status, _) = app.delete(&format!("/api/like/{like}/"), Some(&trinity)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    app.like(&trinity, &review).await;
}

#[tokio::test]
async fn deleting_a_review_removes_its_comments_and_likes() {
    let app = TestApp::new().await;
    let admin = app.admin("architect").await;
    let neo = app.user("neo").await;
    let trinity = app.user("trinity").await;
    let movie = app.movie(&admin, "The Matrix", "1999-03-31").await;
    let review = app.review(&neo, &movie, 5).await;
    app.like(&trinity, &review).await;
    app.post("/api/comments/", Some(&trinity), json!({ "review": review, "body": "Agreed." })).await;

    let (status, _) = app.delete(&format!("/api/review/{review}/"), Some(&neo)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, likes) = app.get("/api/likes/", None).await;
    assert_eq!(likes, json!([]));
    let (_, comments) = app.get("/api/comments/", None).await;
    assert_eq!(comments, json!([]));
}
