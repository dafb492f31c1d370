//! Integration tests for screenshot upload validation
//!
//! Rejected attachments must never create a bug or a file.

use actix_web::{test, App};
use bugtrack::services::BugService;
use serde_json::Value;
use tempfile::TempDir;

use crate::common::{configure_app, create_user, test_config, MultipartBody, TestDb, PNG_BYTES};

fn stored_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[actix_web::test]
async fn test_non_image_extension_rejected() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    let (_, token) = create_user(&db.pool, "reporter").await;

    let (content_type, body) = MultipartBody::new()
        .text("title", "Has a script")
        .text("description", "Attached the wrong file")
        .file("screenshot", "evil.sh", "text/x-shellscript", b"#!/bin/sh\necho hi\n")
        .finish();

    let req = test::TestRequest::post()
        .uri("/api/bugs")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Only image files are allowed!");

    assert_eq!(BugService::count(&db.pool).await.unwrap(), 0);
    assert_eq!(stored_files(dir.path()), 0);
}

#[actix_web::test]
async fn test_image_extension_with_wrong_content_type_rejected() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    let (_, token) = create_user(&db.pool, "reporter").await;

    let (content_type, body) = MultipartBody::new()
        .text("title", "Disguised")
        .text("description", "Not really a png")
        .file("screenshot", "page.png", "text/html", b"<html></html>")
        .finish();

    let req = test::TestRequest::post()
        .uri("/api/bugs")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    assert_eq!(BugService::count(&db.pool).await.unwrap(), 0);
    assert_eq!(stored_files(dir.path()), 0);
}

#[actix_web::test]
async fn test_oversize_screenshot_rejected() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();

    let mut config = test_config(dir.path());
    config.uploads.max_file_size = 1024;

    let app = test::init_service(App::new().configure(configure_app(db.pool.clone(), config))).await;

    let (_, token) = create_user(&db.pool, "reporter").await;

    let mut big = PNG_BYTES.to_vec();
    big.resize(4096, 0);

    let (content_type, body) = MultipartBody::new()
        .text("title", "Huge")
        .text("description", "Very large screenshot")
        .file("screenshot", "huge.png", "image/png", &big)
        .finish();

    let req = test::TestRequest::post()
        .uri("/api/bugs")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 413);

    assert_eq!(BugService::count(&db.pool).await.unwrap(), 0);
    assert_eq!(stored_files(dir.path()), 0);
}

#[actix_web::test]
async fn test_empty_file_input_is_ignored() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    let (_, token) = create_user(&db.pool, "reporter").await;

    let (content_type, body) = MultipartBody::new()
        .text("title", "No file picked")
        .text("description", "Browser sends an empty part")
        .file("screenshot", "", "application/octet-stream", b"")
        .finish();

    let req = test::TestRequest::post()
        .uri("/api/bugs")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let bug: Value = test::read_body_json(resp).await;
    assert!(bug["screenshot"].is_null());
    assert_eq!(stored_files(dir.path()), 0);
}
