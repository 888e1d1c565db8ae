mod builder;
mod error;
mod matchmaker;
mod scheduler;

#[cfg(test)]
mod tests;

pub use builder::MatchmakerBuilder;
pub use error::MatchmakerError;
pub use matchmaker::{KeyFn, Matchmaker, ScanReport};
