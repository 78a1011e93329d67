//! Kanisa Church Library Management System
//!
//! A Rust implementation of the Kanisa church library server, providing a
//! REST JSON API for the catalog, member accounts, and the QR-driven
//! borrow/return workflow.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
