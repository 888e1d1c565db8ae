mod json_file;
mod match_log;
pub mod web;

pub use json_file::JsonFileQueueStore;
pub use match_log::{LaunchedMatch, MatchLog};
