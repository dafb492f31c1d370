use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::{self, Violation};
use crate::error::{AppError, AppResult};
use crate::models::{Bug, BugStatus, NewBug};

pub struct BugService;

/// Advisory lock key serializing serial number allocation
const BUG_SERIAL_LOCK: i64 = 0x6275_6773;

/// Selects bug columns from `source` with creator/assignee names joined in.
/// `source` is either the table itself or a CTE holding changed rows.
fn select_joined(source: &str) -> String {
    format!(
        r#"
        SELECT b.id, b.serial_no, b.title, b.description, b.steps, b.status, b.priority,
               b.screenshot, b.created_by, c.name AS created_by_name,
               b.assigned_to, a.name AS assigned_to_name, b.created_at, b.updated_at
        FROM {} b
        LEFT JOIN users c ON c.id = b.created_by
        LEFT JOIN users a ON a.id = b.assigned_to
        "#,
        source
    )
}

impl BugService {
    /// Lists all bugs, newest first
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Bug>> {
        let sql = format!(
            "{} ORDER BY b.created_at DESC, b.serial_no DESC",
            select_joined("bugs")
        );

        let bugs = sqlx::query_as::<_, Bug>(&sql).fetch_all(pool).await?;

        Ok(bugs)
    }

    /// Gets a bug by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> AppResult<Bug> {
        let sql = format!("{} WHERE b.id = $1", select_joined("bugs"));

        sqlx::query_as::<_, Bug>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Bug not found".to_string()))
    }

    /// Allocates the next serial number: one more than the highest existing one.
    ///
    /// A transaction-scoped advisory lock serializes concurrent creates until
    /// commit or rollback. The max is read in a separate statement so it sees
    /// rows committed by whoever held the lock before.
    pub async fn next_serial_no(tx: &mut Transaction<'_, Postgres>) -> AppResult<i32> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BUG_SERIAL_LOCK)
            .execute(&mut **tx)
            .await?;

        let (serial_no,): (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(serial_no), 0) + 1 FROM bugs")
                .fetch_one(&mut **tx)
                .await?;

        Ok(serial_no)
    }

    /// Creates a new bug with the next serial number
    pub async fn create(pool: &PgPool, input: &NewBug) -> AppResult<Bug> {
        let mut tx = pool.begin().await?;

        let serial_no = Self::next_serial_no(&mut tx).await?;
        let id = Self::insert_with_serial(&mut tx, serial_no, input, BugStatus::Open, None).await?;

        tx.commit().await?;

        log::info!("Created bug #{} ({})", serial_no, id);

        Self::get_by_id(pool, id).await
    }

    /// Inserts a bug row with an explicit serial number, returning its ID
    pub async fn insert_with_serial(
        tx: &mut Transaction<'_, Postgres>,
        serial_no: i32,
        input: &NewBug,
        status: BugStatus,
        assigned_to: Option<Uuid>,
    ) -> AppResult<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO bugs (
                serial_no, title, description, steps, status, priority,
                screenshot, created_by, assigned_to
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(serial_no)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.steps)
        .bind(status.as_str())
        .bind(input.priority)
        .bind(&input.screenshot)
        .bind(input.created_by)
        .bind(assigned_to)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| match db::violation(&e) {
            Some(Violation::Unique) => {
                AppError::Conflict(format!("Serial number {} already in use", serial_no))
            }
            Some(Violation::ForeignKey) => {
                AppError::Unauthorized("Reporting user no longer exists".to_string())
            }
            Some(Violation::Check) => AppError::Validation("Invalid bug fields".to_string()),
            None => AppError::Database(e),
        })?;

        Ok(id)
    }

    /// Sets the workflow status
    pub async fn update_status(pool: &PgPool, id: Uuid, status: BugStatus) -> AppResult<Bug> {
        let sql = format!(
            "WITH changed AS (
                UPDATE bugs SET status = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            ) {}",
            select_joined("changed")
        );

        sqlx::query_as::<_, Bug>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Bug not found".to_string()))
    }

    /// Sets (or clears) the assignee. The user ID is not checked for existence.
    pub async fn assign(pool: &PgPool, id: Uuid, user_id: Option<Uuid>) -> AppResult<Bug> {
        let sql = format!(
            "WITH changed AS (
                UPDATE bugs SET assigned_to = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            ) {}",
            select_joined("changed")
        );

        sqlx::query_as::<_, Bug>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Bug not found".to_string()))
    }

    /// Deletes a bug row
    pub async fn delete(pool: &PgPool, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM bugs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Bug not found".to_string()));
        }

        Ok(())
    }

    /// Counts all bugs
    pub async fn count(pool: &PgPool) -> AppResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bugs")
            .fetch_one(pool)
            .await?;

        Ok(count.0)
    }
}
