#![allow(dead_code)]

use argu::services::argu::{ArguService, NewArgu};
use argu::services::bootstrap_admin::{ensure_bootstrap_admin, BootstrapAdminConfig};
use argu::services::category::CategoryService;
use chrono::{Duration, NaiveDateTime};
use reqwest::Client;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Once,
};

static INIT: Once = Once::new();
static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub const ADMIN_ID: &str = "root";
pub const ADMIN_PASSWORD: &str = "root_password_123";
pub const USER_PASSWORD: &str = "test_password_123";

fn init_env() {
    INIT.call_once(|| {
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        std::env::set_var("RATE_LIMIT_ENABLED", "false");
        let config = argu::config::jwt::JwtConfig::from_env().unwrap();
        let _ = argu::utils::jwt::init_jwt_config(config);
    });
}

fn next_id() -> usize {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Fresh in-memory database with the schema applied. A single pooled
/// connection keeps every query on the same SQLite memory instance.
pub async fn test_db() -> DatabaseConnection {
    init_env();

    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("Failed to open in-memory database");
    argu::migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.addr, path)
    }
}

pub async fn spawn_app() -> TestApp {
    let db = test_db().await;

    let app = axum::Router::new()
        .merge(argu::routes::create_routes())
        .layer(axum::middleware::from_fn(
            argu::middleware::security_headers_middleware,
        ))
        .layer(axum::extract::Extension(db.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        addr: format!("http://{}", addr),
        db,
        client: Client::new(),
    }
}

/// Register a user and return (user_id, token).
pub async fn create_test_user(app: &TestApp, prefix: &str) -> (i32, String) {
    let nickname = format!("{}_{}", prefix, next_id());

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&json!({
            "email": format!("{}@test.com", nickname),
            "password": USER_PASSWORD,
            "nickname": nickname,
        }))
        .send()
        .await
        .expect("Failed to register user");

    let status = resp.status();
    let body: Value = resp.json().await.unwrap();
    assert!(
        body["success"].as_bool().unwrap_or(false),
        "register failed: status={} body={}",
        status,
        body
    );

    let user_id = body["data"]["user"]["id"].as_i64().unwrap() as i32;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    (user_id, token)
}

/// Bootstrap the super admin (once per database) and return its token.
pub async fn admin_token(app: &TestApp) -> String {
    ensure_bootstrap_admin(
        &app.db,
        Some(BootstrapAdminConfig {
            admin_id: ADMIN_ID.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            name: "Root".to_string(),
        }),
    )
    .await
    .unwrap();

    let resp = app
        .client
        .post(app.url("/admin/auth/login"))
        .json(&json!({ "adminId": ADMIN_ID, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    body["data"]["token"].as_str().unwrap().to_string()
}

pub async fn create_category(db: &DatabaseConnection) -> i32 {
    CategoryService::new(db.clone())
        .create(&format!("Category {}", next_id()), None, None, now())
        .await
        .unwrap()
        .id
}

/// A debate that opens in an hour and closes an hour later.
pub async fn create_scheduled_argu(db: &DatabaseConnection, owner_id: i32, category_id: i32) -> i32 {
    let t = now();
    ArguService::new(db.clone())
        .create(
            owner_id,
            NewArgu {
                category_id,
                title: format!("Debate {}", next_id()),
                content: "Should we?".to_string(),
                start_date: t + Duration::hours(1),
                end_date: t + Duration::hours(2),
            },
            t,
        )
        .await
        .unwrap()
        .argu
        .id
}

/// A debate whose window contains the real clock, already swept to ACTIVE.
pub async fn create_active_argu(db: &DatabaseConnection, owner_id: i32, category_id: i32) -> i32 {
    let t = now();
    let service = ArguService::new(db.clone());
    let id = service
        .create(
            owner_id,
            NewArgu {
                category_id,
                title: format!("Live debate {}", next_id()),
                content: "Open for opinions".to_string(),
                start_date: t - Duration::hours(1),
                end_date: t + Duration::hours(1),
            },
            t - Duration::hours(2),
        )
        .await
        .unwrap()
        .argu
        .id;
    service.transition_sweep(t).await.unwrap();
    id
}

pub fn iso(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%S").to_string()
}
