mod common;

use common::*;
use serde_json::{json, Value};

async fn submit(app: &TestApp, token: &str, argu_id: i32, side: &str) -> reqwest::Response {
    app.client
        .post(app.url("/opinions"))
        .bearer_auth(token)
        .json(&json!({ "arguId": argu_id, "side": side, "content": "  my take  " }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn opinion_on_active_debate_is_recorded_once() {
    let app = spawn_app().await;
    let (owner, _) = create_test_user(&app, "owner").await;
    let (voter, token) = create_test_user(&app, "voter").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_active_argu(&app.db, owner, category_id).await;

    let resp = submit(&app, &token, argu_id, "FOR").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["side"], "FOR");
    assert_eq!(body["data"]["userId"], voter);
    assert_eq!(body["data"]["content"], "my take");

    let resp = submit(&app, &token, argu_id, "AGAINST").await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn scheduled_debate_rejects_opinions() {
    let app = spawn_app().await;
    let (owner, _) = create_test_user(&app, "owner").await;
    let (_, token) = create_test_user(&app, "voter").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_scheduled_argu(&app.db, owner, category_id).await;

    let resp = submit(&app, &token, argu_id, "FOR").await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn opinion_on_missing_debate_is_not_found() {
    let app = spawn_app().await;
    let (_, token) = create_test_user(&app, "voter").await;

    let resp = submit(&app, &token, 9999, "NEUTRAL").await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn unknown_side_is_rejected() {
    let app = spawn_app().await;
    let (owner, _) = create_test_user(&app, "owner").await;
    let (_, token) = create_test_user(&app, "voter").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_active_argu(&app.db, owner, category_id).await;

    let resp = submit(&app, &token, argu_id, "MAYBE").await;
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn listing_tallies_each_side() {
    let app = spawn_app().await;
    let (owner, _) = create_test_user(&app, "owner").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_active_argu(&app.db, owner, category_id).await;

    for side in ["FOR", "FOR", "AGAINST", "OTHER"] {
        let (_, token) = create_test_user(&app, "voter").await;
        assert_eq!(submit(&app, &token, argu_id, side).await.status(), 200);
    }

    let body: Value = app
        .client
        .get(app.url(&format!("/opinions/argu/{}", argu_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let data = &body["data"];
    assert_eq!(data["opinions"].as_array().unwrap().len(), 4);
    assert_eq!(data["tally"]["forCount"], 2);
    assert_eq!(data["tally"]["againstCount"], 1);
    assert_eq!(data["tally"]["neutralCount"], 0);
    assert_eq!(data["tally"]["otherCount"], 1);
    assert_eq!(data["tally"]["total"], 4);
}
