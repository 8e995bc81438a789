// SPDX-License-Identifier: MIT

//! Task model and request payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A task on the board, always owned by exactly one user.
///
/// `due_date` is a calendar date with no time component; a task belongs to
/// the "today" view whenever `due_date <= today`, so overdue tasks keep
/// showing up until they are completed, deferred, or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique task id
    pub id: i64,
    /// Owning user's id
    pub user_id: i64,
    /// Short summary line
    pub summary: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Whether the task is done
    pub completed: bool,
    /// Calendar date the task is due
    pub due_date: NaiveDate,
}

/// Input structure for creating or updating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Summary line, 1-200 characters.
    #[validate(length(min = 1, max = 200))]
    pub summary: String,

    /// Optional description, up to 2000 characters.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}
