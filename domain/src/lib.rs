mod matchmaking;

pub use matchmaking::{
    CompatibilityFn, ConfigError, Entry, MatchmakingConfig, OrderingFn, ScanPlan, chunk_queue, plan_scan, scan_queue,
    sort_queue,
};
