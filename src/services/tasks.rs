// SPDX-License-Identifier: MIT

//! Task board operations.
//!
//! All date logic is anchored to the UTC calendar day: new tasks land on
//! today's board, the board shows everything due today or earlier, and
//! deferral counts days forward from today regardless of how overdue the
//! task already was.

use chrono::Duration;

use crate::db::Db;
use crate::error::AppError;
use crate::models::{Task, TaskInput};
use crate::time_utils::today_utc;

/// High-level task operations over the database.
#[derive(Clone)]
pub struct TaskService {
    db: Db,
}

impl TaskService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// The user's board for today: every open task due today or earlier,
    /// oldest first. Completed tasks are off the board until uncompleted.
    pub async fn list_due_today(&self, user_id: i64) -> Result<Vec<Task>, AppError> {
        self.db.list_tasks_due_by(user_id, today_utc()).await
    }

    /// Create a task due today.
    pub async fn create(&self, user_id: i64, input: &TaskInput) -> Result<Task, AppError> {
        self.db.insert_task(user_id, input, today_utc()).await
    }

    /// Get one of the user's tasks by id.
    pub async fn get(&self, user_id: i64, task_id: i64) -> Result<Option<Task>, AppError> {
        self.db.get_task(user_id, task_id).await
    }

    /// Rewrite a task's summary and description.
    pub async fn update(
        &self,
        user_id: i64,
        task_id: i64,
        input: &TaskInput,
    ) -> Result<Option<Task>, AppError> {
        self.db.update_task(user_id, task_id, input).await
    }

    /// Mark a task done. Already-done tasks stay done.
    pub async fn complete(&self, task_id: i64) -> Result<Option<Task>, AppError> {
        self.db.set_task_completed(task_id, true).await
    }

    /// Put a completed task back on the board.
    pub async fn uncomplete(&self, task_id: i64) -> Result<Option<Task>, AppError> {
        self.db.set_task_completed(task_id, false).await
    }

    /// Push a task `days` days into the future, counted from today.
    ///
    /// The previous due date does not matter: deferring a long-overdue task
    /// by one day moves it to tomorrow, not to the day after it was
    /// originally due.
    pub async fn defer(&self, task_id: i64, days: i64) -> Result<Option<Task>, AppError> {
        if days < 1 {
            return Err(AppError::BadRequest(
                "deferral must be at least one day".to_string(),
            ));
        }

        let new_due = today_utc() + Duration::days(days);
        self.db.set_task_due_date(task_id, new_due).await
    }

    /// Delete a task. Returns whether it existed (and was owned by the
    /// user) in the first place.
    pub async fn delete(&self, user_id: i64, task_id: i64) -> Result<bool, AppError> {
        self.db.delete_task(user_id, task_id).await
    }
}
