mod common;

use common::*;
use serde_json::{json, Value};

async fn admin_get(app: &TestApp, token: &str, path: &str) -> (u16, Value) {
    let resp = app
        .client
        .get(app.url(path))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

async fn admin_put(app: &TestApp, token: &str, path: &str, body: Value) -> (u16, Value) {
    let resp = app
        .client
        .put(app.url(path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn admin_login_and_me() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, body) = admin_get(&app, &token, "/admin/auth/me").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["adminId"], ADMIN_ID);
    assert_eq!(body["data"]["role"], "SUPER_ADMIN");

    let resp = app
        .client
        .post(app.url("/admin/auth/login"))
        .json(&json!({ "adminId": ADMIN_ID, "password": "wrong_password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn tokens_do_not_cross_surfaces() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let (_, user) = create_test_user(&app, "user").await;

    let (status, _) = admin_get(&app, &user, "/admin/dashboard").await;
    assert_eq!(status, 401);

    let (status, _) = admin_get(&app, &admin, "/users/me").await;
    assert_eq!(status, 401);

    let resp = app
        .client
        .get(app.url("/admin/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn status_override_and_hiding() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let (owner, _) = create_test_user(&app, "owner").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_scheduled_argu(&app.db, owner, category_id).await;

    let resp = app
        .client
        .put(app.url(&format!("/admin/argu/{}/status?status=FINISHED", argu_id)))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let (status, body) = admin_put(
        &app,
        &admin,
        &format!("/admin/argu/{}/status?status=ENDED", argu_id),
        json!({}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "ENDED");

    let (status, body) = admin_put(
        &app,
        &admin,
        &format!("/admin/argu/{}/toggle-hidden", argu_id),
        json!({}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["isHidden"], true);

    let resp = app
        .client
        .get(app.url(&format!("/argu/{}", argu_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let (status, body) = admin_get(&app, &admin, &format!("/admin/argu/{}", argu_id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["isHidden"], true);

    let (_, body) = admin_get(&app, &admin, "/admin/argu?hidden=true").await;
    assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn admin_edits_started_debates() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let (owner, _) = create_test_user(&app, "owner").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_active_argu(&app.db, owner, category_id).await;

    let (status, body) = admin_put(
        &app,
        &admin,
        &format!("/admin/argu/{}", argu_id),
        json!({ "title": "Moderated title" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["title"], "Moderated title");

    let resp = app
        .client
        .delete(app.url(&format!("/admin/argu/{}", argu_id)))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (status, _) = admin_get(&app, &admin, &format!("/admin/argu/{}", argu_id)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn only_super_admin_manages_admins() {
    let app = spawn_app().await;
    let root = admin_token(&app).await;

    let resp = app
        .client
        .post(app.url("/admin/admins"))
        .bearer_auth(&root)
        .json(&json!({ "adminId": "moderator", "password": "moderator_pw_1", "name": "Mod" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["role"], "ADMIN");
    let moderator_pk = body["data"]["id"].as_i64().unwrap();

    let body: Value = app
        .client
        .post(app.url("/admin/auth/login"))
        .json(&json!({ "adminId": "moderator", "password": "moderator_pw_1" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let moderator = body["data"]["token"].as_str().unwrap().to_string();

    let resp = app
        .client
        .post(app.url("/admin/admins"))
        .bearer_auth(&moderator)
        .json(&json!({ "adminId": "sneaky", "password": "sneaky_pw_123", "name": "Sneaky" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let (status, _) = admin_get(&app, &moderator, "/admin/dashboard").await;
    assert_eq!(status, 200);

    let (status, _) = admin_put(
        &app,
        &root,
        &format!("/admin/admins/{}", moderator_pk),
        json!({ "status": "INACTIVE" }),
    )
    .await;
    assert_eq!(status, 200);

    let (status, _) = admin_get(&app, &moderator, "/admin/dashboard").await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn admin_cannot_delete_itself() {
    let app = spawn_app().await;
    let root = admin_token(&app).await;

    let (_, me) = admin_get(&app, &root, "/admin/auth/me").await;
    let my_pk = me["data"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .delete(app.url(&format!("/admin/admins/{}", my_pk)))
        .bearer_auth(&root)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn category_in_use_cannot_be_deleted() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let (owner, _) = create_test_user(&app, "owner").await;

    let resp = app
        .client
        .post(app.url("/admin/categories"))
        .bearer_auth(&admin)
        .json(&json!({ "name": "Politics", "description": "Hot takes", "orderNum": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let category_id = body["data"]["id"].as_i64().unwrap() as i32;

    let resp = app
        .client
        .post(app.url("/admin/categories"))
        .bearer_auth(&admin)
        .json(&json!({ "name": "Politics" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    create_scheduled_argu(&app.db, owner, category_id).await;

    let resp = app
        .client
        .delete(app.url(&format!("/admin/categories/{}", category_id)))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = app
        .client
        .get(app.url(&format!("/categories/{}", category_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["arguCount"], 1);
}

#[tokio::test]
async fn soft_deleted_user_cannot_sign_in() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let (user_id, token) = create_test_user(&app, "leaver").await;

    let (_, profile) = {
        let resp = app
            .client
            .get(app.url("/users/me"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        (resp.status(), resp.json::<Value>().await.unwrap())
    };
    let email = profile["data"]["email"].as_str().unwrap().to_string();

    let resp = app
        .client
        .delete(app.url(&format!("/admin/users/{}", user_id)))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (status, body) = admin_get(&app, &admin, &format!("/admin/users/{}", user_id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["user"]["status"], "DELETED");

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&json!({ "email": email, "password": USER_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .get(app.url("/users/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn comment_moderation() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let (owner, token) = create_test_user(&app, "owner").await;
    let category_id = create_category(&app.db).await;
    let argu_id = create_scheduled_argu(&app.db, owner, category_id).await;

    let body: Value = app
        .client
        .post(app.url("/comments"))
        .bearer_auth(&token)
        .json(&json!({ "arguId": argu_id, "content": "buy cheap pills" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let comment_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = admin_get(&app, &admin, "/admin/comments?keyword=pills").await;
    assert_eq!(body["data"]["total"], 1);

    let (status, body) = admin_put(
        &app,
        &admin,
        &format!("/admin/comments/{}/toggle-hidden", comment_id),
        json!({}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["isHidden"], true);

    let body: Value = app
        .client
        .get(app.url(&format!("/comments/argu/{}", argu_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["total"], 0);

    let body: Value = app
        .client
        .get(app.url(&format!("/argu/{}", argu_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["commentCount"], 0);
}

#[tokio::test]
async fn dashboard_and_statistics() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let (owner, _) = create_test_user(&app, "owner").await;
    create_test_user(&app, "other").await;
    let category_id = create_category(&app.db).await;
    create_scheduled_argu(&app.db, owner, category_id).await;
    create_active_argu(&app.db, owner, category_id).await;

    let (status, body) = admin_get(&app, &admin, "/admin/dashboard").await;
    assert_eq!(status, 200);
    let totals = &body["data"]["totals"];
    assert_eq!(totals["totalUsers"], 2);
    assert_eq!(totals["totalArgus"], 2);
    assert_eq!(totals["activeArgus"], 1);
    assert_eq!(totals["pendingReports"], 0);
    assert_eq!(body["data"]["recentUsers"].as_array().unwrap().len(), 2);

    let (status, body) = admin_get(&app, &admin, "/admin/statistics?days=3").await;
    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["users"]["total"], 2);
    assert_eq!(data["users"]["active"], 2);
    assert_eq!(data["argus"]["scheduled"], 1);
    assert_eq!(data["argus"]["active"], 1);
    assert_eq!(data["dailyRegistrations"].as_array().unwrap().len(), 3);
    assert_eq!(data["dailyArguCreations"].as_array().unwrap().len(), 3);
}
