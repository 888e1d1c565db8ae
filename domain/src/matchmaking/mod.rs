mod config;
mod entry;
mod error;
mod scan;


pub use config::{CompatibilityFn, MatchmakingConfig, OrderingFn};
pub use entry::Entry;
pub use error::ConfigError;
pub use scan::{ScanPlan, chunk_queue, plan_scan, scan_queue, sort_queue};
