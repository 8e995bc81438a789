// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod task;
pub mod user;

pub use task::{Task, TaskInput};
pub use user::User;
