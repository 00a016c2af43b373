//! Authentication middleware
//!
//! Axum middleware for JWT authentication and admin authorization.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// Authentication middleware
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`,
/// then injects [`CurrentUser`] into request extensions.
///
/// Paths skipped entirely: `OPTIONS *` (CORS preflight) and anything
/// outside `/api/`. Public routes (login, catalog reads) pass through
/// without a header; when a header IS present it still gets validated,
/// so handlers can honor the admin-only inactive-inclusive view and
/// bad credentials are never silently ignored.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path().to_string();

    // Non-API routes fall through to their own 404s
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let public = is_public_route(req.method(), &path);

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let token = match auth_header {
        Some(header) => match JwtService::extract_from_header(&header) {
            Some(token) => token.to_string(),
            None => return Err(AppError::invalid_token("Invalid authorization header")),
        },
        None => {
            if public {
                return Ok(next.run(req).await);
            }
            tracing::warn!(target: "security", uri = %req.uri(), "Missing authorization header");
            return Err(AppError::unauthorized());
        }
    };

    match state.get_jwt_service().validate_token(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser::from(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(
                target: "security",
                error = %e,
                uri = %req.uri(),
                "Token validation failed"
            );
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Routes reachable without credentials
fn is_public_route(method: &http::Method, path: &str) -> bool {
    if path == "/api/auth/login" {
        return method == http::Method::POST;
    }
    if method == http::Method::GET {
        return path == "/api/products"
            || path.starts_with("/api/products/")
            || path == "/api/categories"
            || path.starts_with("/api/categories/");
    }
    false
}

/// Administrator middleware
///
/// Checks `CurrentUser.role == "admin"`; non-admins get 403.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        tracing::warn!(
            target: "security",
            user_id = %user.id,
            username = %user.username,
            role = %user.role,
            "Admin role required"
        );
        return Err(AppError::forbidden("Administrator role required"));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_routes_cover_catalog_reads_and_login() {
        assert!(is_public_route(&http::Method::POST, "/api/auth/login"));
        assert!(is_public_route(&http::Method::GET, "/api/products"));
        assert!(is_public_route(&http::Method::GET, "/api/products/product:abc"));
        assert!(is_public_route(&http::Method::GET, "/api/categories"));
        assert!(is_public_route(&http::Method::GET, "/api/categories/category:abc"));
    }

    #[test]
    fn mutations_and_session_routes_are_not_public() {
        assert!(!is_public_route(&http::Method::POST, "/api/products"));
        assert!(!is_public_route(&http::Method::PUT, "/api/products/product:abc"));
        assert!(!is_public_route(&http::Method::DELETE, "/api/categories/category:abc"));
        assert!(!is_public_route(&http::Method::GET, "/api/auth/me"));
        assert!(!is_public_route(&http::Method::POST, "/api/auth/logout"));
        assert!(!is_public_route(&http::Method::GET, "/api/auth/login"));
    }
}
