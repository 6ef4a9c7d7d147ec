mod common;

use common::*;
use serde_json::{json, Value};

async fn register(app: &TestApp, email: &str, password: &str, nickname: &str) -> reqwest::Response {
    app.client
        .post(app.url("/auth/register"))
        .json(&json!({ "email": email, "password": password, "nickname": nickname }))
        .send()
        .await
        .unwrap()
}

async fn login(app: &TestApp, email: &str, password: &str) -> reqwest::Response {
    app.client
        .post(app.url("/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn register_returns_token_and_profile() {
    let app = spawn_app().await;

    let resp = register(&app, "Alice@Example.com", USER_PASSWORD, "alice").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let data = &body["data"];
    assert_eq!(data["tokenType"], "Bearer");
    assert!(data["expiresIn"].as_u64().unwrap() > 0);
    assert_eq!(data["user"]["email"], "alice@example.com");
    assert_eq!(data["user"]["status"], "ACTIVE");
    assert!(data["user"].get("passwordHash").is_none());

    let token = data["token"].as_str().unwrap();
    let resp = app
        .client
        .get(app.url("/users/me"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["nickname"], "alice");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = spawn_app().await;

    assert_eq!(
        register(&app, "bob@example.com", USER_PASSWORD, "bob").await.status(),
        200
    );
    assert_eq!(
        register(&app, "BOB@example.com", USER_PASSWORD, "bobby").await.status(),
        400
    );
}

#[tokio::test]
async fn register_validates_fields() {
    let app = spawn_app().await;

    let resp = register(&app, "not-an-email", "short", "").await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["email"].is_string());
    assert!(body["data"]["password"].is_string());
    assert!(body["data"]["nickname"].is_string());
}

#[tokio::test]
async fn login_checks_credentials() {
    let app = spawn_app().await;
    register(&app, "carol@example.com", USER_PASSWORD, "carol").await;

    let resp = login(&app, "carol@example.com", USER_PASSWORD).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["token"].is_string());

    assert_eq!(login(&app, "carol@example.com", "wrong_password").await.status(), 401);
    assert_eq!(login(&app, "nobody@example.com", USER_PASSWORD).await.status(), 401);
}

#[tokio::test]
async fn suspended_user_is_locked_out() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let resp = register(&app, "dave@example.com", USER_PASSWORD, "dave").await;
    let body: Value = resp.json().await.unwrap();
    let user_id = body["data"]["user"]["id"].as_i64().unwrap();
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let resp = app
        .client
        .put(app.url(&format!("/admin/users/{}/status", user_id)))
        .bearer_auth(&admin)
        .json(&json!({ "status": "SUSPENDED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    assert_eq!(login(&app, "dave@example.com", USER_PASSWORD).await.status(), 403);

    let resp = app
        .client
        .get(app.url("/users/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    app.client
        .put(app.url(&format!("/admin/users/{}/status", user_id)))
        .bearer_auth(&admin)
        .json(&json!({ "status": "ACTIVE" }))
        .send()
        .await
        .unwrap();
    assert_eq!(login(&app, "dave@example.com", USER_PASSWORD).await.status(), 200);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = spawn_app().await;

    let resp = app
        .client
        .get(app.url("/users/me"))
        .bearer_auth("not.a.jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}
