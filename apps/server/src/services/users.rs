use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::{self, Violation};
use crate::error::{AppError, AppResult};
use crate::models::{CreateUserRequest, User, UserRole};

pub struct UsersService;

impl UsersService {
    /// Creates a new user
    pub async fn create_user(pool: &PgPool, req: &CreateUserRequest) -> AppResult<User> {
        let password_hash = User::hash_password(&req.password)?;
        let role = req.role.unwrap_or_default();

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at
            "#,
        )
        .bind(req.name.trim())
        .bind(req.email.trim())
        .bind(&password_hash)
        .bind(role.as_str())
        .fetch_one(pool)
        .await
        .map_err(map_insert_error)
    }

    /// Creates a user inside an open transaction (used by the seed routine)
    pub async fn create_user_tx(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> AppResult<User> {
        let password_hash = User::hash_password(password)?;

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .bind(role.as_str())
        .fetch_one(&mut **tx)
        .await
        .map_err(map_insert_error)
    }

    /// Gets a user by email
    pub async fn get_by_email(pool: &PgPool, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.trim())
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID
    pub async fn get_by_id(pool: &PgPool, user_id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Counts total number of users
    pub async fn user_count(pool: &PgPool) -> AppResult<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM users
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(count.0)
    }
}

fn map_insert_error(e: sqlx::Error) -> AppError {
    match db::violation(&e) {
        Some(Violation::Unique) => AppError::Conflict("Email already exists".to_string()),
        _ => AppError::Database(e),
    }
}
