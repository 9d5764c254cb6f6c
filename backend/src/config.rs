//! # Configuration
//!
//! Server settings and per-tab colour thresholds, read from an optional YAML
//! file then overridden by environment variables.
//!
//! ## YAML Format
//!
//! ```yaml
//! bind_address: "127.0.0.1:3000"
//! database_url: "sqlite:dashboard.db"
//! thresholds:
//!   hours: { success_at: 90, warning_at: 75 }
//!   quality: { success_at: 80, warning_at: 60 }
//! ```
//!
//! Tabs missing from `thresholds` keep their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::{Thresholds, ViewKind};
use std::collections::BTreeMap;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;

use crate::domain::thresholds::checked_thresholds;

pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";
pub const BIND_ADDR_ENV: &str = "DASHBOARD_BIND_ADDR";
pub const DATABASE_URL_ENV: &str = "DASHBOARD_DATABASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub thresholds: BTreeMap<ViewKind, Thresholds>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: "sqlite:dashboard.db".to_string(),
            thresholds: default_thresholds(),
        }
    }
}

/// Workshop tabs use 90/75, ratio tabs use 80/60
pub fn default_thresholds() -> BTreeMap<ViewKind, Thresholds> {
    ViewKind::ALL
        .into_iter()
        .map(|kind| {
            let t = match kind {
                ViewKind::Hours | ViewKind::Revenue | ViewKind::Parts => Thresholds::STANDARD,
                ViewKind::Productivity | ViewKind::Quality => Thresholds::RELAXED,
            };
            (kind, t)
        })
        .collect()
}

impl AppConfig {
    /// Load from `DASHBOARD_CONFIG` (if set) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: AppConfig = serde_yaml::from_str(yaml)?;
        for (kind, t) in default_thresholds() {
            config.thresholds.entry(kind).or_insert(t);
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply `DASHBOARD_BIND_ADDR` / `DASHBOARD_DATABASE_URL` through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(BIND_ADDR_ENV) {
            self.bind_address = addr
                .parse()
                .with_context(|| format!("Invalid {}: {}", BIND_ADDR_ENV, addr))?;
        }
        if let Some(url) = lookup(DATABASE_URL_ENV) {
            self.database_url = url;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for (kind, t) in &self.thresholds {
            checked_thresholds(t.success_at, t.warning_at)
                .with_context(|| format!("Invalid thresholds for {}", kind))?;
        }
        Ok(())
    }
}
