pub mod config;
pub mod error;
pub mod fetch;
pub mod present;
pub mod process;
pub mod server;
pub mod snapshot;
pub mod stats;

pub use config::Config;
pub use error::DashboardError;
pub use snapshot::{build_snapshot, build_snapshot_from_html, DashboardSnapshot};
