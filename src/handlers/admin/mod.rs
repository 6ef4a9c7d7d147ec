//! Admin console surface. Every handler here runs behind
//! `admin_auth_middleware` except `auth::login`.

pub mod accounts;
pub mod argu;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod dashboard;
pub mod reports;
pub mod users;
