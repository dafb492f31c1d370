//! Unit tests for bearer token authentication
//!
//! Exercises the `RequireAuth` middleware and the `AuthenticatedUser`
//! extractor against a dummy handler, without a database.

use actix_web::{test, web, App, HttpResponse};
use bugtrack::auth::{AuthenticatedUser, Claims, TokenKeys};
use bugtrack::middleware::auth::RequireAuth;
use bugtrack::models::UserRole;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

const SECRET: &str = "unit-test-secret";

async fn whoami(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "id": user.0.user_id,
        "role": user.0.role,
    }))
}

fn claims(user_id: Uuid, exp_offset_secs: i64) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        sub: user_id,
        role: UserRole::Tester,
        exp: now + exp_offset_secs,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    }
}

macro_rules! protected_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(TokenKeys::new(SECRET, 1)))
                .service(
                    web::scope("/protected")
                        .wrap(RequireAuth)
                        .route("", web::get().to(whoami)),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn test_valid_token_exposes_identity() {
    let app = protected_app!();
    let user_id = Uuid::new_v4();
    let token = TokenKeys::new(SECRET, 1).sign(&claims(user_id, 3600)).unwrap();

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], user_id.to_string());
    assert_eq!(body["role"], "tester");
}

#[actix_web::test]
async fn test_missing_token() {
    let app = protected_app!();

    let req = test::TestRequest::get().uri("/protected").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "No token, authorization denied");
}

#[actix_web::test]
async fn test_empty_bearer_counts_as_missing() {
    let app = protected_app!();

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", "Bearer "))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "No token, authorization denied");
}

#[actix_web::test]
async fn test_token_signed_with_other_secret() {
    let app = protected_app!();
    let token = TokenKeys::new("another-secret", 1)
        .sign(&claims(Uuid::new_v4(), 3600))
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Token is not valid");
}

#[actix_web::test]
async fn test_expired_token() {
    let app = protected_app!();
    // Well past the default validation leeway
    let token = TokenKeys::new(SECRET, 1)
        .sign(&claims(Uuid::new_v4(), -3600))
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_preflight_passes_without_token() {
    let app = protected_app!();

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/protected")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_ne!(resp.status(), 401);
}
