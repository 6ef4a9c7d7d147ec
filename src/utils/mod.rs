pub mod jwt;
pub mod password;

pub use jwt::{encode_admin_token, encode_user_token};
pub use password::{hash_password, verify_password};
