//! Core library for the `weatherboard` dashboard.
//!
//! This crate defines:
//! - Configuration handling
//! - Domain models for regional forecasts, display records and the clock
//! - The forecast selector and the dashboard state controller
//! - The refresh scheduler and the BMKG forecast source
//!
//! It is used by `weatherboard-cli`, but can also be reused by other
//! binaries or services.

pub mod config;
pub mod model;
pub mod scheduler;
pub mod select;
pub mod source;
pub mod state;

pub use config::Config;
pub use model::{ClockState, DisplayRecord, ForecastPoint, RegionSeries};
pub use scheduler::{SchedulerHandle, SharedDashboard, start};
pub use select::{find_next_point, select_display_records};
pub use source::{ForecastSource, SourceError, bmkg::BmkgSource};
pub use state::{Dashboard, DashboardSnapshot};
