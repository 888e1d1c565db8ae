use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max match size must be at least 1")]
    ZeroMaxMatchSize,

    #[error("min match size must be at least 1")]
    ZeroMinMatchSize,

    #[error("min match size {min} exceeds max match size {max}")]
    MinExceedsMax { min: usize, max: usize },

    #[error("scan interval must be greater than zero")]
    ZeroScanInterval,
}
