pub mod auth;
pub mod security;

pub use auth::{
    admin_auth_middleware, auth_middleware, optional_auth_middleware, AuthAdmin, AuthUser,
};
pub use security::security_headers_middleware;
