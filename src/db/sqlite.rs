// SPDX-License-Identifier: MIT

//! SQLite client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile + provider token storage)
//! - Tasks (the per-user board)
//!
//! Due dates are stored as ISO-8601 TEXT (`YYYY-MM-DD`), which makes SQL
//! string comparison agree with chronological order.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::AppError;
use crate::models::user::OAuthProfile;
use crate::models::{Task, TaskInput, User};
use crate::time_utils::format_utc_rfc3339;

/// SQLite database client.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open (and if necessary create) the database, then ensure the schema.
    ///
    /// `sqlite::memory:` is accepted for tests; in-memory databases get a
    /// single-connection pool since every connection would otherwise see
    /// its own empty database.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("Invalid DATABASE_URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open SQLite database: {}", e)))?;

        let db = Self { pool };
        db.init_schema().await?;

        tracing::info!(url = database_url, "Connected to SQLite");

        Ok(db)
    }

    /// Create the tables and indexes if they do not exist yet.
    async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                 id            INTEGER PRIMARY KEY AUTOINCREMENT,
                 provider      TEXT NOT NULL,
                 provider_id   TEXT NOT NULL,
                 email         TEXT,
                 name          TEXT,
                 avatar_url    TEXT,
                 access_token  TEXT NOT NULL,
                 refresh_token TEXT,
                 created_at    TEXT NOT NULL,
                 updated_at    TEXT NOT NULL,
                 UNIQUE (provider, provider_id)
             )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                 id          INTEGER PRIMARY KEY AUTOINCREMENT,
                 user_id     INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
                 summary     TEXT NOT NULL,
                 description TEXT,
                 completed   INTEGER NOT NULL DEFAULT 0,
                 due_date    TEXT NOT NULL
             )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_user_due ON tasks (user_id, due_date)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by local id.
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, provider, provider_id, email, name, avatar_url,
                    access_token, refresh_token, created_at, updated_at
             FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Create the user for an OAuth identity, or refresh an existing row.
    ///
    /// Rows are unique per `(provider, provider_id)`. A re-login updates the
    /// profile fields, tokens, and `updated_at`; `created_at` is only set on
    /// first insert. Returns the canonical row either way.
    pub async fn upsert_user(&self, profile: &OAuthProfile) -> Result<User, AppError> {
        let now = format_utc_rfc3339(Utc::now());

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (provider, provider_id, email, name, avatar_url,
                                access_token, refresh_token, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (provider, provider_id) DO UPDATE SET
                 email = excluded.email,
                 name = excluded.name,
                 avatar_url = excluded.avatar_url,
                 access_token = excluded.access_token,
                 refresh_token = excluded.refresh_token,
                 updated_at = excluded.updated_at
             RETURNING id, provider, provider_id, email, name, avatar_url,
                       access_token, refresh_token, created_at, updated_at",
        )
        .bind(&profile.provider)
        .bind(&profile.provider_id)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(&profile.avatar_url)
        .bind(&profile.access_token)
        .bind(&profile.refresh_token)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    // ─── Task Operations ─────────────────────────────────────────

    /// All of a user's open tasks due on or before `date`, oldest first.
    /// Completed tasks drop off the list no matter their due date.
    pub async fn list_tasks_due_by(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, user_id, summary, description, completed, due_date
             FROM tasks WHERE user_id = ? AND due_date <= ? AND completed = 0
             ORDER BY id",
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Insert a new task for `user_id`, due on `due_date`.
    pub async fn insert_task(
        &self,
        user_id: i64,
        input: &TaskInput,
        due_date: NaiveDate,
    ) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (user_id, summary, description, completed, due_date)
             VALUES (?, ?, ?, 0, ?)
             RETURNING id, user_id, summary, description, completed, due_date",
        )
        .bind(user_id)
        .bind(&input.summary)
        .bind(&input.description)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    /// Get a task by id, scoped to its owner. A task owned by someone else
    /// is reported as absent.
    pub async fn get_task(&self, user_id: i64, task_id: i64) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            "SELECT id, user_id, summary, description, completed, due_date
             FROM tasks WHERE id = ? AND user_id = ?",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Rewrite a task's summary and description, scoped to its owner.
    pub async fn update_task(
        &self,
        user_id: i64,
        task_id: i64,
        input: &TaskInput,
    ) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET summary = ?, description = ?
             WHERE id = ? AND user_id = ?
             RETURNING id, user_id, summary, description, completed, due_date",
        )
        .bind(&input.summary)
        .bind(&input.description)
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Set or clear a task's completed flag.
    pub async fn set_task_completed(
        &self,
        task_id: i64,
        completed: bool,
    ) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET completed = ? WHERE id = ?
             RETURNING id, user_id, summary, description, completed, due_date",
        )
        .bind(completed)
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Move a task to a new due date.
    pub async fn set_task_due_date(
        &self,
        task_id: i64,
        due_date: NaiveDate,
    ) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET due_date = ? WHERE id = ?
             RETURNING id, user_id, summary, description, completed, due_date",
        )
        .bind(due_date)
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Delete a task, scoped to its owner. Returns whether a row was
    /// actually removed.
    pub async fn delete_task(&self, user_id: i64, task_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
