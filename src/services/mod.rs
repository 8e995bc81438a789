// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod github;
pub mod session;
pub mod tasks;
pub mod users;

pub use github::GithubClient;
pub use session::SessionService;
pub use tasks::TaskService;
pub use users::UserDirectory;
