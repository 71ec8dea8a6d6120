use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use scribe_api::{AppStateInner, router};
use scribe_core::{Blog, Sha256Hasher};
use scribe_db::Database;

const SECRET: &str = "test-secret";

fn app() -> Router {
    let blog = Blog::new(Database::open_in_memory().unwrap(), Sha256Hasher);
    router(Arc::new(AppStateInner {
        blog,
        jwt_secret: SECRET.to_string(),
    }))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers `name` and returns (user_id, token).
async fn signup(app: &Router, name: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        None,
        Some(json!({
            "email": format!("{name}@x.com"),
            "password": "password1",
            "username": name,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    (
        body["user_id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

async fn post_article(app: &Router, token: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/posts",
        Some(token),
        Some(json!({ "title": "T", "content": "body" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["article_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_and_login() {
    let app = app();
    let (user_id, _) = signup(&app, "alice").await;

    let (status, body) = send(
        &app,
        "POST",
        "/users/login",
        None,
        Some(json!({ "email": "alice@x.com", "password": "password1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user_id.as_str());
    assert_eq!(body["username"], "alice");
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn bad_login_is_unauthorized() {
    let app = app();
    signup(&app, "alice").await;

    for (email, password) in [("alice@x.com", "wrong-password"), ("nobody@x.com", "password1")] {
        let (status, body) = send(
            &app,
            "POST",
            "/users/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["path"], "/users/login");
    }
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = app();
    signup(&app, "alice").await;

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        None,
        Some(json!({ "email": "alice@x.com", "password": "password1", "username": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Duplicate email");
}

#[tokio::test]
async fn invalid_input_is_bad_request() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/users",
        None,
        Some(json!({ "email": "not-an-email", "password": "password1", "username": "a" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, token) = signup(&app, "alice").await;
    let (status, body) = send(
        &app,
        "POST",
        "/posts",
        Some(&token),
        Some(json!({ "title": "  ", "content": "body" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["path"], "/posts");

    let (status, _) = send(
        &app,
        "POST",
        "/posts",
        Some(&token),
        Some(json!({ "title": "t", "content": "body", "extra": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = app();
    let body = json!({ "title": "T", "content": "body" });

    let (status, _) = send(&app, "POST", "/posts", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", "/posts", Some("garbage"), Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_owner_cannot_update_or_delete_article() {
    let app = app();
    let (_, alice) = signup(&app, "alice").await;
    let (_, bob) = signup(&app, "bob").await;
    let article = post_article(&app, &alice).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/posts/{article}"),
        Some(&bob),
        Some(json!({ "title": "hijacked", "content": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &format!("/posts/{article}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", &format!("/posts/{article}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["article"]["title"], "T");
}

#[tokio::test]
async fn missing_article_is_forbidden_for_mutation_and_not_found_for_reads() {
    let app = app();
    let (_, alice) = signup(&app, "alice").await;
    let missing = "00000000-0000-0000-0000-000000000042";

    let (status, _) = send(&app, "DELETE", &format!("/posts/{missing}"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &format!("/posts/{missing}"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/posts/not-a-uuid", Some(&alice), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn owner_updates_and_deletes_article_with_comments() {
    let app = app();
    let (_, alice) = signup(&app, "alice").await;
    let (_, bob) = signup(&app, "bob").await;
    let article = post_article(&app, &alice).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/posts/{article}"),
        Some(&alice),
        Some(json!({ "title": "T2", "content": "edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "T2");
    assert_eq!(body["email"], "alice@x.com");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/posts/{article}/comments"),
        Some(&bob),
        Some(json!({ "content": "nice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment = body["comment_id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", &format!("/posts/{article}"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/posts/{article}"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The comment went with the article, so bob no longer owns anything there.
    let (status, _) = send(&app, "DELETE", &format!("/comments/{comment}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &format!("/posts/{article}"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_ownership_is_enforced() {
    let app = app();
    let (_, alice) = signup(&app, "alice").await;
    let (_, bob) = signup(&app, "bob").await;
    let article = post_article(&app, &alice).await;

    let (_, body) = send(
        &app,
        "POST",
        &format!("/posts/{article}/comments"),
        Some(&bob),
        Some(json!({ "content": "first" })),
    )
    .await;
    let comment = body["comment_id"].as_str().unwrap().to_string();

    // Article owner does not own other people's comments on it.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/comments/{comment}"),
        Some(&alice),
        Some(json!({ "content": "censored" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/comments/{comment}"),
        Some(&bob),
        Some(json!({ "content": "edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "edited");

    let (status, _) = send(&app, "DELETE", &format!("/comments/{comment}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn comment_on_missing_article_is_not_found() {
    let app = app();
    let (_, alice) = signup(&app, "alice").await;
    let (status, _) = send(
        &app,
        "POST",
        "/posts/00000000-0000-0000-0000-000000000042/comments",
        Some(&alice),
        Some(json!({ "content": "hello?" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_delete_only_themselves_and_cascade() {
    let app = app();
    let (alice_id, alice) = signup(&app, "alice").await;
    let (bob_id, bob) = signup(&app, "bob").await;
    let article = post_article(&app, &alice).await;

    let (status, _) = send(&app, "DELETE", &format!("/users/{alice_id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &format!("/users/{alice_id}"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/posts/{article}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A token for a deleted user no longer maps to a principal.
    let (status, _) = send(
        &app,
        "POST",
        "/posts",
        Some(&alice),
        Some(json!({ "title": "T", "content": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "DELETE", &format!("/users/{alice_id}"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/users/{bob_id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unknown_routes_and_methods_get_the_error_body() {
    let app = app();

    let (status, body) = send(&app, "GET", "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/nowhere");
    assert!(body["time"].is_string());

    let (status, body) = send(&app, "DELETE", "/health", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["path"], "/health");
    assert_eq!(body["message"], "Method not allowed");
}
