use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::jwt::TokenKeys;
use crate::error::AppError;
use crate::models::UserRole;

pub const MISSING_TOKEN: &str = "No token, authorization denied";
pub const INVALID_TOKEN: &str = "Token is not valid";

/// Identity decoded from a valid bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Extracts the raw token from an `Authorization: Bearer <token>` header.
/// Returns `None` when there is no usable token at all.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())?;

    let token = header
        .strip_prefix("Bearer ")
        .unwrap_or(header)
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Validates the bearer token of a request
pub fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let keys = req
        .app_data::<web::Data<TokenKeys>>()
        .ok_or_else(|| AppError::Internal("Token keys not configured".to_string()))?;

    let token = bearer_token(req).ok_or_else(|| AppError::Unauthorized(MISSING_TOKEN.to_string()))?;

    let claims = keys.verify(&token).map_err(|e| {
        log::debug!("Rejected bearer token: {}", e);
        AppError::Unauthorized(INVALID_TOKEN.to_string())
    })?;

    Ok(Identity {
        user_id: claims.sub,
        role: claims.role,
    })
}

/// Extractor for the authenticated caller.
///
/// Reuses the identity attached by [`crate::middleware::auth::RequireAuth`]
/// and falls back to validating the header itself when the route is not
/// wrapped by the middleware.
///
/// ```ignore
/// async fn handler(user: AuthenticatedUser) -> HttpResponse {
///     // user.0.user_id is the caller
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(identity) = req.extensions().get::<Identity>() {
            return ready(Ok(AuthenticatedUser(identity.clone())));
        }

        ready(authenticate(req).map(AuthenticatedUser))
    }
}
