//! # Domain Module
//!
//! Business logic of the dealership dashboard, independent of HTTP and of
//! the storage backend.
//!
//! ## Module Organization
//!
//! - **calculator**: remaining / percent complete / straight-line projection
//! - **thresholds**: success / warning / danger banding of percentages
//! - **period**: elapsed fraction of the current month
//! - **mock_data**: hardcoded figures for each tab
//! - **dashboard**: assembles KPI cards and totals for a tab
//! - **potential_lock**: the planning view's lock toggle over a key-value store
//!
//! The calculator is pure and knows nothing about storage; only
//! `potential_lock` touches the [`crate::db::KeyValueStore`].

pub mod calculator;
pub mod dashboard;
pub mod mock_data;
pub mod period;
pub mod potential_lock;
pub mod thresholds;

pub use dashboard::{DashboardError, DashboardService};
pub use period::{TimeProgress, TimeProgressError};
pub use potential_lock::PotentialLockService;
pub use thresholds::ThresholdError;
