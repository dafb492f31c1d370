use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Serialize;

use crate::config::Config;
use crate::db::{self, DbPool};

#[derive(Serialize)]
pub struct LivenessResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    status: &'static str,
    checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    database: &'static str,
    uploads: &'static str,
}

fn check_label(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

/// Liveness check: 200 while the process is up
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(LivenessResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness check: 200 when the database answers, 503 otherwise.
/// The upload directory is reported but does not gate readiness, since it
/// is created on the first upload.
pub async fn readiness(pool: web::Data<DbPool>, config: Option<web::Data<Config>>) -> HttpResponse {
    let db_healthy = db::health_check(pool.get_ref()).await;

    let uploads_ok = match &config {
        Some(config) => tokio::fs::try_exists(&config.uploads.dir)
            .await
            .unwrap_or(false),
        None => false,
    };

    let (status, http_status) = if db_healthy {
        ("ready", StatusCode::OK)
    } else {
        ("not_ready", StatusCode::SERVICE_UNAVAILABLE)
    };

    HttpResponse::build(http_status).json(ReadinessResponse {
        status,
        checks: ReadinessChecks {
            database: check_label(db_healthy),
            uploads: check_label(uploads_ok),
        },
    })
}

/// Configure health routes (no auth required)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(liveness))
            .route("/ready", web::get().to(readiness)),
    );
}
