use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::RequireAuth;
use crate::models::{AssignBug, BugStatus, DeleteResponse, NewBug, UpdateBugStatus};
use crate::services::BugService;
use crate::uploads;

/// Parses a bug id from the path. Malformed ids are reported as not found.
fn parse_bug_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Bug not found".to_string()))
}

/// GET /api/bugs
/// Lists all bugs, newest first
pub async fn list_bugs(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let bugs = BugService::list(pool.get_ref()).await?;
    let responses: Vec<_> = bugs.iter().map(|b| b.to_response()).collect();

    Ok(HttpResponse::Ok().json(responses))
}

/// GET /api/bugs/{id}
pub async fn get_bug(pool: web::Data<DbPool>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_bug_id(&path)?;
    let bug = BugService::get_by_id(pool.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(bug.to_response()))
}

/// POST /api/bugs
/// Creates a bug from a multipart form with an optional screenshot
pub async fn create_bug(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    user: AuthenticatedUser,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = uploads::read_bug_form(payload, config.uploads.max_file_size).await?;

    let mut input = NewBug::from_form(
        form.title.as_deref(),
        form.description.as_deref(),
        form.steps.as_deref(),
        form.priority.as_deref(),
        user.0.user_id,
    )?;

    if let Some(attachment) = &form.screenshot {
        let public = uploads::store_screenshot(
            &config.uploads.dir,
            &attachment.extension,
            &attachment.data,
        )
        .await?;
        input.screenshot = Some(public);
    }

    let bug = match BugService::create(pool.get_ref(), &input).await {
        Ok(bug) => bug,
        Err(e) => {
            // Don't leave an orphaned screenshot behind
            if let Some(public) = &input.screenshot {
                if let Err(cleanup) = uploads::remove_screenshot(&config.uploads.dir, public).await
                {
                    log::warn!("Failed to clean up screenshot {}: {}", public, cleanup);
                }
            }
            return Err(e);
        }
    };

    Ok(HttpResponse::Created().json(bug.to_response()))
}

/// PATCH /api/bugs/{id}/status
pub async fn update_status(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    body: web::Json<UpdateBugStatus>,
) -> AppResult<HttpResponse> {
    let id = parse_bug_id(&path)?;

    let status: BugStatus = body
        .status
        .as_deref()
        .ok_or_else(|| AppError::Validation("Invalid status".to_string()))?
        .parse()
        .map_err(|_| AppError::Validation("Invalid status".to_string()))?;

    let bug = BugService::update_status(pool.get_ref(), id, status).await?;

    Ok(HttpResponse::Ok().json(bug.to_response()))
}

/// PATCH /api/bugs/{id}/assign
/// Sets the assignee. The user id is not checked against existing users.
pub async fn assign_bug(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    body: web::Json<AssignBug>,
) -> AppResult<HttpResponse> {
    let id = parse_bug_id(&path)?;

    let user_id = body
        .user_id
        .as_deref()
        .map(|raw| {
            Uuid::parse_str(raw)
                .map_err(|_| AppError::Validation(format!("Invalid user id '{}'", raw)))
        })
        .transpose()?;

    let bug = BugService::assign(pool.get_ref(), id, user_id).await?;

    Ok(HttpResponse::Ok().json(bug.to_response()))
}

/// DELETE /api/bugs/{id}
/// Deletes the bug and its stored screenshot
pub async fn delete_bug(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_bug_id(&path)?;
    let bug = BugService::get_by_id(pool.get_ref(), id).await?;

    if let Some(public) = &bug.screenshot {
        if uploads::remove_screenshot(&config.uploads.dir, public).await? {
            log::info!("Removed screenshot {} of bug #{}", public, bug.serial_no);
        }
    }

    BugService::delete(pool.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "Bug removed".to_string(),
    }))
}

/// Configure bug routes (all require a bearer token)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/bugs")
            .wrap(RequireAuth)
            .route("", web::get().to(list_bugs))
            .route("", web::post().to(create_bug))
            .route("/{id}", web::get().to(get_bug))
            .route("/{id}", web::delete().to(delete_bug))
            .route("/{id}/status", web::patch().to(update_status))
            .route("/{id}/assign", web::patch().to(assign_bug)),
    );
}
