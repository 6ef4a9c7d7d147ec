mod common;

use common::*;
use serde_json::{json, Value};

async fn post_comment(
    app: &TestApp,
    token: &str,
    argu_id: i32,
    parent_id: Option<i32>,
    content: &str,
) -> reqwest::Response {
    app.client
        .post(app.url("/comments"))
        .bearer_auth(token)
        .json(&json!({ "arguId": argu_id, "parentId": parent_id, "content": content }))
        .send()
        .await
        .unwrap()
}

async fn comment_id(resp: reqwest::Response) -> i64 {
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn comments_are_accepted_before_the_debate_starts() {
    let app = spawn_app().await;
    let (owner, token) = create_test_user(&app, "owner").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_scheduled_argu(&app.db, owner, category_id).await;

    let resp = post_comment(&app, &token, argu_id, None, "First!").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["content"], "First!");
    assert_eq!(body["data"]["arguId"], argu_id);
    assert!(body["data"]["parentId"].is_null());
}

#[tokio::test]
async fn replies_are_nested_under_their_parent() {
    let app = spawn_app().await;
    let (owner, token) = create_test_user(&app, "owner").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_scheduled_argu(&app.db, owner, category_id).await;

    let parent = comment_id(post_comment(&app, &token, argu_id, None, "Top").await).await;
    comment_id(post_comment(&app, &token, argu_id, Some(parent as i32), "Reply").await).await;
    comment_id(post_comment(&app, &token, argu_id, None, "Another top").await).await;

    let body: Value = app
        .client
        .get(app.url(&format!("/comments/argu/{}", argu_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let data = &body["data"];
    assert_eq!(data["total"], 2);
    let items = data["items"].as_array().unwrap();
    assert_eq!(items[0]["id"], parent);
    assert_eq!(items[0]["replies"][0]["content"], "Reply");
    assert_eq!(items[1]["replies"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn parent_from_another_debate_is_rejected() {
    let app = spawn_app().await;
    let (owner, token) = create_test_user(&app, "owner").await;
    let category_id = create_category(&app.db).await;
    let first = create_scheduled_argu(&app.db, owner, category_id).await;
    let second = create_scheduled_argu(&app.db, owner, category_id).await;

    let parent = comment_id(post_comment(&app, &token, first, None, "Top").await).await;

    let resp = post_comment(&app, &token, second, Some(parent as i32), "Wrong place").await;
    assert_eq!(resp.status(), 400);

    let resp = post_comment(&app, &token, second, Some(9999), "No parent").await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn blank_comment_is_rejected() {
    let app = spawn_app().await;
    let (owner, token) = create_test_user(&app, "owner").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_scheduled_argu(&app.db, owner, category_id).await;

    let resp = post_comment(&app, &token, argu_id, None, "   ").await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn only_the_author_deletes_and_replies_go_too() {
    let app = spawn_app().await;
    let (owner, token) = create_test_user(&app, "owner").await;
    let (_, other_token) = create_test_user(&app, "other").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_scheduled_argu(&app.db, owner, category_id).await;

    let parent = comment_id(post_comment(&app, &token, argu_id, None, "Top").await).await;
    comment_id(post_comment(&app, &other_token, argu_id, Some(parent as i32), "Reply").await)
        .await;

    let resp = app
        .client
        .delete(app.url(&format!("/comments/{}", parent)))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = app
        .client
        .delete(app.url(&format!("/comments/{}", parent)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = app
        .client
        .get(app.url("/my/comments"))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["total"], 0);
}
