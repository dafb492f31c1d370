use actix_web::{web, HttpResponse, Responder};

use crate::auth::{AuthenticatedUser, TokenKeys};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::RequireAuth;
use crate::models::{AuthResponse, CreateUserRequest, LoginRequest, UserResponse};
use crate::services::UsersService;

/// Email validation - checks basic format requirements
fn is_valid_email(email: &str) -> bool {
    // Must have exactly one @
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() || local.len() > 64 {
        return false;
    }

    if domain.is_empty() || domain.len() > 255 || !domain.contains('.') {
        return false;
    }

    // Catches "user@.com", "user@domain." and "user@a..b"
    let domain_parts: Vec<&str> = domain.split('.').collect();
    if domain_parts.iter().any(|p| p.is_empty()) {
        return false;
    }

    domain_parts.last().is_some_and(|tld| tld.len() >= 2)
}

/// POST /api/auth/register
/// Create a new account and return a bearer token for it
pub async fn register(
    pool: web::Data<DbPool>,
    keys: web::Data<TokenKeys>,
    req: web::Json<CreateUserRequest>,
) -> AppResult<impl Responder> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    if !is_valid_email(req.email.trim()) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    if req.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    let user = UsersService::create_user(pool.get_ref(), &req).await?;
    let token = keys.issue(&user)?;

    log::info!("Registered user {} ({})", user.email, user.role);

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// POST /api/auth/login
/// Verify credentials and return a bearer token
pub async fn login(
    pool: web::Data<DbPool>,
    keys: web::Data<TokenKeys>,
    req: web::Json<LoginRequest>,
) -> AppResult<impl Responder> {
    let user = UsersService::get_by_email(pool.get_ref(), &req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !user.verify_password(&req.password)? {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = keys.issue(&user)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/me
/// Get the account behind the bearer token
pub async fn get_current_user(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
) -> AppResult<impl Responder> {
    let user = UsersService::get_by_id(pool.get_ref(), user.0.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .service(
                web::resource("/me")
                    .wrap(RequireAuth)
                    .route(web::get().to(get_current_user)),
            ),
    );
}
