//! Lendstock Equipment Lending Portal
//!
//! A Rust REST API server that lets registered users borrow shared physical
//! equipment from a finite pool and lets administrators approve, deny and
//! process returns, keeping per-item availability consistent with the set of
//! in-flight requests.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub pool: sqlx::PgPool,
}
