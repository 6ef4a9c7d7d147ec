use crate::{
    error::{AppError, AppResult},
    models::{Admin, AdminRole, AdminStatus, User, UserStatus},
    utils::jwt::{decode_jwt, Claims, TokenScope},
};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
    Extension,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::convert::Infallible;

/// Caller identity on the user surface.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i32,
}

/// Caller identity on the admin surface.
#[derive(Debug, Clone, Copy)]
pub struct AuthAdmin {
    pub admin_id: i32,
    pub role: AdminRole,
}

impl AuthAdmin {
    pub fn require_super_admin(&self) -> AppResult<()> {
        if self.role != AdminRole::SuperAdmin {
            return Err(AppError::forbidden("Super admin privileges required"));
        }
        Ok(())
    }
}

/// Verifies a user-scoped bearer token and that the user is still active.
pub async fn auth_middleware(
    Extension(db): Extension<DatabaseConnection>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = authenticate(&headers, TokenScope::User)?;

    let user = User::find_by_id(user_id)
        .one(&db)
        .await?
        .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

    if user.status != UserStatus::Active {
        return Err(AppError::forbidden("Account is not active"));
    }

    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}

/// Like `auth_middleware` but lets anonymous requests through. A valid token
/// still attaches `AuthUser` so handlers can personalise the response.
pub async fn optional_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    if let Ok(user_id) = authenticate(&headers, TokenScope::User) {
        request.extensions_mut().insert(AuthUser { user_id });
    }
    next.run(request).await
}

/// Verifies an admin-scoped bearer token and that the admin account is active.
pub async fn admin_auth_middleware(
    Extension(db): Extension<DatabaseConnection>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let admin_id = authenticate(&headers, TokenScope::Admin)?;

    let admin = Admin::find_by_id(admin_id)
        .one(&db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Admin no longer exists"))?;

    if admin.status != AdminStatus::Active {
        return Err(AppError::unauthorized("Admin account is inactive"));
    }

    request.extensions_mut().insert(AuthAdmin {
        admin_id,
        role: admin.role,
    });
    Ok(next.run(request).await)
}

fn authenticate(headers: &HeaderMap, scope: TokenScope) -> AppResult<i32> {
    let token = extract_bearer_token(headers)
        .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;

    let claims: Claims =
        decode_jwt(&token).map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

    if claims.scope != scope {
        return Err(AppError::unauthorized("Token not valid for this API"));
    }

    claims
        .subject_id()
        .ok_or_else(|| AppError::unauthorized("Invalid subject in token"))
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    let token = auth_header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthUser>().copied())
    }
}

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthAdmin>()
            .copied()
            .ok_or_else(|| AppError::unauthorized("Admin authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, HeaderValue};

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn only_super_admin_passes_role_gate() {
        let super_admin = AuthAdmin {
            admin_id: 1,
            role: AdminRole::SuperAdmin,
        };
        let admin = AuthAdmin {
            admin_id: 2,
            role: AdminRole::Admin,
        };
        assert!(super_admin.require_super_admin().is_ok());
        assert!(matches!(
            admin.require_super_admin(),
            Err(AppError::Forbidden(_))
        ));
    }
}
