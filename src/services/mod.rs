pub mod admin_account;
pub mod argu;
pub mod auth;
pub mod bookmark;
pub mod bootstrap_admin;
pub mod category;
pub mod chat;
pub mod comment;
pub mod dashboard;
pub mod lifecycle;
pub mod like;
pub mod opinion;
pub mod report;
pub mod scheduler;
pub mod user;
