use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("{name} has invalid value {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: String,
    pub scan_interval: Duration,
    pub min_match_size: usize,
    pub max_match_size: usize,
    pub max_rating_spread: u32,
    pub queue_file: Option<PathBuf>,
    pub match_history: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            scan_interval: Duration::from_millis(5000),
            min_match_size: 2,
            max_match_size: 5,
            max_rating_spread: 300,
            queue_file: None,
            match_history: 100,
        }
    }
}

impl ServerConfig {
    /// Reads `MATCHMAKER_*` variables, falling back to the defaults for any that are unset.
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerConfigError> {
        let defaults = Self::default();
        Ok(Self {
            bind: lookup("MATCHMAKER_BIND").unwrap_or(defaults.bind),
            scan_interval: parse(&lookup, "MATCHMAKER_SCAN_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.scan_interval),
            min_match_size: parse(&lookup, "MATCHMAKER_MIN_MATCH")?.unwrap_or(defaults.min_match_size),
            max_match_size: parse(&lookup, "MATCHMAKER_MAX_MATCH")?.unwrap_or(defaults.max_match_size),
            max_rating_spread: parse(&lookup, "MATCHMAKER_MAX_RATING_SPREAD")?.unwrap_or(defaults.max_rating_spread),
            queue_file: lookup("MATCHMAKER_QUEUE_FILE").map(PathBuf::from),
            match_history: parse(&lookup, "MATCHMAKER_MATCH_HISTORY")?.unwrap_or(defaults.match_history),
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ServerConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ServerConfigError::InvalidValue { name, value }),
    }
}
