use argu::{config, handlers, middleware, migration, routes, services, utils};
use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use std::env;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        // Auth
        handlers::auth::register,
        handlers::auth::login,
        // Users
        handlers::user::get_user_profile,
        handlers::user::get_current_user,
        handlers::user::update_profile,
        // Debates
        handlers::argu::create_argu,
        handlers::argu::get_argu,
        handlers::argu::update_argu,
        handlers::argu::delete_argu,
        handlers::argu::list_argu,
        handlers::argu::search_argu,
        handlers::argu::list_argu_by_category,
        // Opinions
        handlers::opinion::create_opinion,
        handlers::opinion::list_opinions,
        // Comments
        handlers::comment::create_comment,
        handlers::comment::list_comments,
        handlers::comment::delete_comment,
        // Likes and bookmarks
        handlers::like::toggle_like,
        handlers::like::like_status,
        handlers::bookmark::toggle_bookmark,
        handlers::bookmark::list_bookmarks,
        // Reports
        handlers::report::create_report,
        // Categories
        handlers::category::list_categories,
        handlers::category::get_category,
        // My page
        handlers::mypage::my_argu,
        handlers::mypage::my_comments,
        handlers::mypage::my_opinions,
        handlers::mypage::my_likes,
        // Chat
        handlers::chat::post_message,
        handlers::chat::list_messages,
        // Admin
        handlers::admin::auth::login,
        handlers::admin::auth::me,
        handlers::admin::accounts::list_admins,
        handlers::admin::accounts::get_admin,
        handlers::admin::accounts::create_admin,
        handlers::admin::accounts::update_admin,
        handlers::admin::accounts::change_password,
        handlers::admin::accounts::delete_admin,
        handlers::admin::argu::search_argu,
        handlers::admin::argu::get_argu,
        handlers::admin::argu::update_argu,
        handlers::admin::argu::set_status,
        handlers::admin::argu::toggle_hidden,
        handlers::admin::argu::delete_argu,
        handlers::admin::users::search_users,
        handlers::admin::users::get_user,
        handlers::admin::users::set_user_status,
        handlers::admin::users::delete_user,
        handlers::admin::comments::search_comments,
        handlers::admin::comments::toggle_hidden,
        handlers::admin::comments::delete_comment,
        handlers::admin::reports::list_reports,
        handlers::admin::reports::get_report,
        handlers::admin::reports::process_report,
        handlers::admin::categories::create_category,
        handlers::admin::categories::update_category,
        handlers::admin::categories::delete_category,
        handlers::admin::dashboard::dashboard,
        handlers::admin::dashboard::statistics,
    ),
    components(
        schemas(
            argu::response::ApiResponse<serde_json::Value>,
            argu::response::PaginatedResponse<serde_json::Value>,
            argu::response::PaginationQuery,
            argu::error::AppError,
            argu::models::ArguStatus,
            argu::models::OpinionSide,
            argu::models::ReportStatus,
            argu::models::ReportTargetType,
            argu::models::UserStatus,
            argu::models::AdminRole,
            argu::models::AdminStatus,
        )
    ),
    modifiers(&BearerSchemes),
    tags(
        (name = "auth", description = "Registration and sign-in"),
        (name = "users", description = "User profiles"),
        (name = "argu", description = "Debates and their lifecycle"),
        (name = "opinions", description = "Sides taken on active debates"),
        (name = "comments", description = "Debate comments"),
        (name = "likes", description = "Debate likes"),
        (name = "bookmarks", description = "Debate bookmarks"),
        (name = "reports", description = "Abuse reports"),
        (name = "categories", description = "Debate categories"),
        (name = "my", description = "Caller's own activity"),
        (name = "chat", description = "Per-debate chat"),
        (name = "admin", description = "Admin console"),
    )
)]
struct ApiDoc;

struct BearerSchemes;

impl Modify for BearerSchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        for name in ["jwt_token", "admin_token"] {
            components.add_security_scheme(
                name,
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    // Fail fast on configuration before touching the database
    let (jwt_config, database_url) = validate_config()?;
    utils::jwt::init_jwt_config(jwt_config)?;

    tracing::info!("Starting Argu API v{}...", env!("CARGO_PKG_VERSION"));

    let db = config::database::get_database(&database_url).await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let bootstrap = services::bootstrap_admin::BootstrapAdminConfig::from_env();
    services::bootstrap_admin::ensure_bootstrap_admin(&db, bootstrap).await?;

    let sweeper = services::scheduler::spawn_status_sweeper(
        db.clone(),
        config::sweep::SweepConfig::from_env(),
    );

    let app = create_app().layer(Extension(db));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    tracing::info!("Server shut down gracefully");
    Ok(())
}

fn init_tracing() {
    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "argu=debug,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

/// Validate all required configuration at startup (fail-fast).
fn validate_config() -> anyhow::Result<(config::jwt::JwtConfig, String)> {
    let jwt_config = config::jwt::JwtConfig::from_env()?;

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable must be set"))?;

    Ok((jwt_config, database_url))
}

fn build_cors_layer() -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    let origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins_str == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

fn create_app() -> Router {
    Router::new()
        .route("/", get(health_check))
        .merge(routes::create_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check", body = serde_json::Value)
    )
)]
async fn health_check(Extension(db): Extension<DatabaseConnection>) -> impl IntoResponse {
    let db_ok = db.ping().await.is_ok();
    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "Argu API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_ok,
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
