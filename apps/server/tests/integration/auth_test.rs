//! Integration tests for the Authentication API
//!
//! Covers: register, login, current user and bearer token rejection.

use actix_web::{test, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::common::{configure_app, create_user, test_config, TestDb};

#[actix_web::test]
async fn test_register_returns_token_and_user() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "s3cret"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["role"], "tester");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[actix_web::test]
async fn test_register_duplicate_email_conflicts() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    let payload = json!({
        "name": "Ada",
        "email": "ada@example.com",
        "password": "s3cret"
    });

    let first = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), 201);

    let second = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, second).await;
    assert_eq!(resp.status(), 409);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Email already exists");
}

#[actix_web::test]
async fn test_register_rejects_invalid_email() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Ada",
            "email": "not-an-email",
            "password": "s3cret"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_login_and_me() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    let (user, _) = create_user(&db.pool, "grace").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "grace@example.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let me: Value = test::read_body_json(resp).await;
    assert_eq!(me["id"], user.id.to_string());
    assert_eq!(me["role"], "developer");
}

#[actix_web::test]
async fn test_login_wrong_password() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    create_user(&db.pool, "grace").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "grace@example.com", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Invalid credentials");
}

#[actix_web::test]
async fn test_bugs_require_token() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    let req = test::TestRequest::get().uri("/api/bugs").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "No token, authorization denied");
}

#[actix_web::test]
async fn test_bugs_reject_invalid_token() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    let req = test::TestRequest::get()
        .uri("/api/bugs")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Token is not valid");
}

#[actix_web::test]
async fn test_me_requires_valid_token() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "No token, authorization denied");

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Token is not valid");
}
