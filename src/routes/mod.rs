use crate::config::rate_limit::{RateLimitConfig, RouteGroup};
use crate::handlers::{self, admin};
use crate::middleware::{admin_auth_middleware, auth_middleware, optional_auth_middleware};
use axum::{middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new().nest("/api", api_routes(&RateLimitConfig::from_env()))
}

fn api_routes(config: &RateLimitConfig) -> Router {
    let auth = auth_routes(config);
    let public = public_routes(config);
    let user = user_routes(config).layer(middleware::from_fn(auth_middleware));
    let admin = admin_routes(config).layer(middleware::from_fn(admin_auth_middleware));

    auth.merge(public).merge(user).merge(admin)
}

/// Credential exchange for both principal spaces.
fn auth_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/auth/register", routing::post(handlers::auth::register))
        .route("/auth/login", routing::post(handlers::auth::login))
        .route("/admin/auth/login", routing::post(admin::auth::login));

    with_rate_limit(router, config, RouteGroup::Auth)
}

/// Anonymous reads. Hidden debates never show up here.
fn public_routes(config: &RateLimitConfig) -> Router {
    let personalised = Router::new()
        .route(
            "/likes/argu/{argu_id}",
            routing::get(handlers::like::like_status),
        )
        .layer(middleware::from_fn(optional_auth_middleware));

    let router = Router::new()
        // Debates
        .route("/argu", routing::get(handlers::argu::list_argu))
        .route("/argu/search", routing::get(handlers::argu::search_argu))
        .route(
            "/argu/category/{id}",
            routing::get(handlers::argu::list_argu_by_category),
        )
        .route("/argu/{id}", routing::get(handlers::argu::get_argu))
        // Opinions and comments
        .route(
            "/opinions/argu/{argu_id}",
            routing::get(handlers::opinion::list_opinions),
        )
        .route(
            "/comments/argu/{argu_id}",
            routing::get(handlers::comment::list_comments),
        )
        // Categories
        .route(
            "/categories",
            routing::get(handlers::category::list_categories),
        )
        .route(
            "/categories/{id}",
            routing::get(handlers::category::get_category),
        )
        // Users
        .route("/users/{id}", routing::get(handlers::user::get_user_profile))
        // Chat
        .route(
            "/chat/argu/{argu_id}",
            routing::get(handlers::chat::list_messages),
        )
        .merge(personalised);

    with_rate_limit(router, config, RouteGroup::Public)
}

/// Everything that needs a signed-in, active user.
fn user_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Profile
        .route(
            "/users/me",
            routing::get(handlers::user::get_current_user).put(handlers::user::update_profile),
        )
        // Debates
        .route("/argu", routing::post(handlers::argu::create_argu))
        .route(
            "/argu/{id}",
            routing::put(handlers::argu::update_argu).delete(handlers::argu::delete_argu),
        )
        // Opinions
        .route("/opinions", routing::post(handlers::opinion::create_opinion))
        // Comments
        .route("/comments", routing::post(handlers::comment::create_comment))
        .route(
            "/comments/{id}",
            routing::delete(handlers::comment::delete_comment),
        )
        // Likes and bookmarks
        .route(
            "/likes/argu/{argu_id}",
            routing::post(handlers::like::toggle_like),
        )
        .route(
            "/bookmarks/argu/{argu_id}",
            routing::post(handlers::bookmark::toggle_bookmark),
        )
        .route(
            "/bookmarks",
            routing::get(handlers::bookmark::list_bookmarks),
        )
        // Reports
        .route("/reports", routing::post(handlers::report::create_report))
        // My page
        .route("/my/argu", routing::get(handlers::mypage::my_argu))
        .route("/my/comments", routing::get(handlers::mypage::my_comments))
        .route("/my/opinions", routing::get(handlers::mypage::my_opinions))
        .route("/my/likes", routing::get(handlers::mypage::my_likes))
        // Chat
        .route(
            "/chat/argu/{argu_id}",
            routing::post(handlers::chat::post_message),
        );

    with_rate_limit(router, config, RouteGroup::User)
}

/// Admin console. Role checks beyond "is an active admin" happen in handlers.
fn admin_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/admin/auth/me", routing::get(admin::auth::me))
        // Admin accounts
        .route(
            "/admin/admins",
            routing::get(admin::accounts::list_admins).post(admin::accounts::create_admin),
        )
        .route(
            "/admin/admins/{id}",
            routing::get(admin::accounts::get_admin)
                .put(admin::accounts::update_admin)
                .delete(admin::accounts::delete_admin),
        )
        .route(
            "/admin/admins/{id}/password",
            routing::put(admin::accounts::change_password),
        )
        // Debates
        .route("/admin/argu", routing::get(admin::argu::search_argu))
        .route(
            "/admin/argu/{id}",
            routing::get(admin::argu::get_argu)
                .put(admin::argu::update_argu)
                .delete(admin::argu::delete_argu),
        )
        .route(
            "/admin/argu/{id}/status",
            routing::put(admin::argu::set_status),
        )
        .route(
            "/admin/argu/{id}/toggle-hidden",
            routing::put(admin::argu::toggle_hidden),
        )
        // Users
        .route("/admin/users", routing::get(admin::users::search_users))
        .route(
            "/admin/users/{id}",
            routing::get(admin::users::get_user).delete(admin::users::delete_user),
        )
        .route(
            "/admin/users/{id}/status",
            routing::put(admin::users::set_user_status),
        )
        // Comments
        .route(
            "/admin/comments",
            routing::get(admin::comments::search_comments),
        )
        .route(
            "/admin/comments/{id}",
            routing::delete(admin::comments::delete_comment),
        )
        .route(
            "/admin/comments/{id}/toggle-hidden",
            routing::put(admin::comments::toggle_hidden),
        )
        // Reports
        .route("/admin/reports", routing::get(admin::reports::list_reports))
        .route(
            "/admin/reports/{id}",
            routing::get(admin::reports::get_report),
        )
        .route(
            "/admin/reports/{id}/process",
            routing::put(admin::reports::process_report),
        )
        // Categories
        .route(
            "/admin/categories",
            routing::post(admin::categories::create_category),
        )
        .route(
            "/admin/categories/{id}",
            routing::put(admin::categories::update_category)
                .delete(admin::categories::delete_category),
        )
        // Dashboard
        .route("/admin/dashboard", routing::get(admin::dashboard::dashboard))
        .route(
            "/admin/statistics",
            routing::get(admin::dashboard::statistics),
        );

    with_rate_limit(router, config, RouteGroup::Admin)
}

fn with_rate_limit(router: Router, config: &RateLimitConfig, group: RouteGroup) -> Router {
    if !config.enabled {
        return router;
    }

    let rule = config.rule(group);
    let Some(governor_conf) = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
    else {
        tracing::warn!(?group, "invalid rate limit rule, serving without a limiter");
        return router;
    };

    router.layer(GovernorLayer::new(governor_conf))
}
