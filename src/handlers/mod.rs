pub mod admin;
pub mod argu;
pub mod auth;
pub mod bookmark;
pub mod category;
pub mod chat;
pub mod comment;
pub mod like;
pub mod mypage;
pub mod opinion;
pub mod report;
pub mod user;
