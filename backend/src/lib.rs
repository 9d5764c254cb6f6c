//! # Dealership Dashboard Backend
//!
//! Serves the KPI tabs of the after-sales dashboard (atelier hours, CA APV,
//! PR sales, productivity, quality) and the planning view's lock toggle.
//!
//! ## Architecture
//!
//! ```text
//! rest    (axum handlers, JSON DTOs from `shared`)
//!   ↓
//! domain  (calculator, thresholds, dashboard tabs, potential lock)
//!   ↓
//! db      (key-value store: SQLite or in-memory)
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod rest;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::db::SqliteKeyValueStore;
use crate::domain::{DashboardService, PotentialLockService};
pub use crate::rest::{create_router, AppState};

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Opening key-value store at {}", config.database_url);
    let store = SqliteKeyValueStore::connect(&config.database_url).await?;

    info!("Setting up domain services");
    let dashboard = DashboardService::new(config.thresholds.clone());
    let potential_lock = PotentialLockService::new(Arc::new(store));

    Ok(AppState::new(dashboard, potential_lock))
}
