// SPDX-License-Identifier: MIT

//! Dayboard: a personal daily task board.
//!
//! This crate provides the backend for a single-owner task board: GitHub
//! sign-in, a session cookie, and per-user tasks organized around "what is
//! due today".

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;
use services::{GithubClient, SessionService, TaskService, UserDirectory};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub github: GithubClient,
    pub users: UserDirectory,
    pub sessions: SessionService,
    pub tasks: TaskService,
}

impl AppState {
    /// Wire up the service layer over a connected database.
    pub fn new(config: Config, db: Db) -> Self {
        let github = GithubClient::new(
            config.github_client_id.clone(),
            config.github_client_secret.clone(),
        );
        let users = UserDirectory::new(db.clone());
        let sessions = SessionService::new(&config, users.clone());
        let tasks = TaskService::new(db.clone());

        Self {
            config,
            db,
            github,
            users,
            sessions,
            tasks,
        }
    }
}
