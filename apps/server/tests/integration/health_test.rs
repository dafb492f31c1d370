//! Integration tests for health endpoints

use actix_web::{test, App};
use serde_json::Value;
use tempfile::TempDir;

use crate::common::{configure_app, test_config, TestDb};

#[actix_web::test]
async fn test_liveness() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn test_readiness_reports_checks() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    let req = test::TestRequest::get().uri("/health/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "ok");
    assert_eq!(body["checks"]["uploads"], "ok");
}

#[actix_web::test]
async fn test_readiness_fails_when_database_closed() {
    let db = TestDb::new().await;
    let dir = TempDir::new().unwrap();
    let app =
        test::init_service(App::new().configure(configure_app(db.pool.clone(), test_config(dir.path()))))
            .await;

    db.pool.close().await;

    let req = test::TestRequest::get().uri("/health/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["checks"]["database"], "error");
}
