mod common;

use argu::services::argu::ArguService;
use argu::services::chat::ChatService;
use chrono::{Duration, Timelike};
use common::*;
use serde_json::{json, Value};

async fn get_json(app: &TestApp, path: &str, token: Option<&str>) -> (u16, Value) {
    let mut req = app.client.get(app.url(path));
    if let Some(token) = token {
        req = req.bearer_auth(token);
    }
    let resp = req.send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn like_toggle_flips_and_counts() {
    let app = spawn_app().await;
    let (owner, _) = create_test_user(&app, "owner").await;
    let (_, token) = create_test_user(&app, "fan").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_scheduled_argu(&app.db, owner, category_id).await;
    let path = format!("/likes/argu/{}", argu_id);

    let body: Value = app
        .client
        .post(app.url(&path))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["liked"], true);

    let (status, body) = get_json(&app, &path, Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["liked"], true);
    assert_eq!(body["data"]["likeCount"], 1);

    let (_, body) = get_json(&app, &path, None).await;
    assert_eq!(body["data"]["liked"], false);
    assert_eq!(body["data"]["likeCount"], 1);

    let body: Value = app
        .client
        .post(app.url(&path))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["liked"], false);

    let (_, body) = get_json(&app, &path, Some(&token)).await;
    assert_eq!(body["data"]["likeCount"], 0);
}

#[tokio::test]
async fn liking_missing_debate_is_not_found() {
    let app = spawn_app().await;
    let (_, token) = create_test_user(&app, "fan").await;

    let resp = app
        .client
        .post(app.url("/likes/argu/9999"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn my_likes_lists_own_debates_by_like_count() {
    let app = spawn_app().await;
    let (owner, owner_token) = create_test_user(&app, "owner").await;
    let (_, fan_token) = create_test_user(&app, "fan").await;
    let (_, fan2_token) = create_test_user(&app, "fan").await;
    let category_id = create_category(&app.db).await;
    let once = create_scheduled_argu(&app.db, owner, category_id).await;
    let twice = create_scheduled_argu(&app.db, owner, category_id).await;
    create_scheduled_argu(&app.db, owner, category_id).await;

    for (token, id) in [(&fan_token, once), (&fan_token, twice), (&fan2_token, twice)] {
        app.client
            .post(app.url(&format!("/likes/argu/{}", id)))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
    }

    let (status, body) = get_json(&app, "/my/likes", Some(&owner_token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["items"][0]["id"], twice);
    assert_eq!(body["data"]["items"][0]["likeCount"], 2);
    assert_eq!(body["data"]["items"][1]["id"], once);

    let (_, body) = get_json(&app, "/my/likes", Some(&fan_token)).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn bookmarks_toggle_and_list() {
    let app = spawn_app().await;
    let (owner, _) = create_test_user(&app, "owner").await;
    let (_, token) = create_test_user(&app, "reader").await;
    let category_id = create_category(&app.db).await;
    let first = create_scheduled_argu(&app.db, owner, category_id).await;
    let second = create_scheduled_argu(&app.db, owner, category_id).await;

    for id in [first, second] {
        let body: Value = app
            .client
            .post(app.url(&format!("/bookmarks/argu/{}", id)))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["data"]["bookmarked"], true);
    }

    let body: Value = app
        .client
        .post(app.url(&format!("/bookmarks/argu/{}", first)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["bookmarked"], false);

    let (status, body) = get_json(&app, "/bookmarks", Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["id"], second);
}

#[tokio::test]
async fn bookmarks_require_auth() {
    let app = spawn_app().await;
    let (status, _) = get_json(&app, "/bookmarks", None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn chat_posts_and_lists_newest_first() {
    let app = spawn_app().await;
    let (owner, token) = create_test_user(&app, "owner").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_active_argu(&app.db, owner, category_id).await;
    let path = format!("/chat/argu/{}", argu_id);

    for message in ["hello", "  world  "] {
        let resp = app
            .client
            .post(app.url(&path))
            .bearer_auth(&token)
            .json(&json!({ "message": message }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let (status, body) = get_json(&app, &path, None).await;
    assert_eq!(status, 200);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(items[0]["message"], "world");
    assert_eq!(items[1]["message"], "hello");
    assert!(items[0]["nickname"].as_str().unwrap().starts_with("owner_"));
}

#[tokio::test]
async fn chat_after_returns_only_newer_messages_in_order() {
    let app = spawn_app().await;
    let (owner, _) = create_test_user(&app, "owner").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_active_argu(&app.db, owner, category_id).await;

    let chat = ChatService::new(app.db.clone());
    let base = (now() - Duration::minutes(10)).with_nanosecond(0).unwrap();
    for (offset, message) in [(0, "one"), (1, "two"), (2, "three")] {
        chat.post(owner, argu_id, message, base + Duration::minutes(offset))
            .await
            .unwrap();
    }

    let (status, body) = get_json(
        &app,
        &format!("/chat/argu/{}?after={}", argu_id, iso(base)),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let messages: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["two", "three"]);
}

#[tokio::test]
async fn chat_rejects_blank_messages_and_hidden_debates() {
    let app = spawn_app().await;
    let (owner, token) = create_test_user(&app, "owner").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_active_argu(&app.db, owner, category_id).await;
    let path = format!("/chat/argu/{}", argu_id);

    let resp = app
        .client
        .post(app.url(&path))
        .bearer_auth(&token)
        .json(&json!({ "message": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    ArguService::new(app.db.clone())
        .toggle_hidden(argu_id, now())
        .await
        .unwrap();

    let resp = app
        .client
        .post(app.url(&path))
        .bearer_auth(&token)
        .json(&json!({ "message": "anyone?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let (status, _) = get_json(&app, &path, None).await;
    assert_eq!(status, 404);
}
