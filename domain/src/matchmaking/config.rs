use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::{ConfigError, Entry};

/// Decides whether a whole chunk of the sorted queue may be launched together.
pub type CompatibilityFn<P> = Arc<dyn Fn(&[Entry<P>]) -> bool + Send + Sync>;

/// Three-way comparator used to sort the queue before every scan.
pub type OrderingFn<P> = Arc<dyn Fn(&Entry<P>, &Entry<P>) -> Ordering + Send + Sync>;

pub struct MatchmakingConfig<P> {
    pub scan_interval: Duration,
    pub min_match_size: usize,
    pub max_match_size: usize,
    pub compatibility: CompatibilityFn<P>,
    pub ordering: OrderingFn<P>,
}

impl<P: 'static> Default for MatchmakingConfig<P> {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_millis(5000),
            min_match_size: 2,
            max_match_size: 5,
            compatibility: Arc::new(|_: &[Entry<P>]| true),
            ordering: Arc::new(|a: &Entry<P>, b: &Entry<P>| a.added_at.cmp(&b.added_at)),
        }
    }
}

impl<P> Clone for MatchmakingConfig<P> {
    fn clone(&self) -> Self {
        Self {
            scan_interval: self.scan_interval,
            min_match_size: self.min_match_size,
            max_match_size: self.max_match_size,
            compatibility: Arc::clone(&self.compatibility),
            ordering: Arc::clone(&self.ordering),
        }
    }
}

impl<P> fmt::Debug for MatchmakingConfig<P> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("MatchmakingConfig")
            .field("scan_interval", &self.scan_interval)
            .field("min_match_size", &self.min_match_size)
            .field("max_match_size", &self.max_match_size)
            .finish_non_exhaustive()
    }
}

impl<P> MatchmakingConfig<P> {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_match_size == 0 {
            return Err(ConfigError::ZeroMaxMatchSize);
        }
        if self.min_match_size == 0 {
            return Err(ConfigError::ZeroMinMatchSize);
        }
        if self.min_match_size > self.max_match_size {
            return Err(ConfigError::MinExceedsMax {
                min: self.min_match_size,
                max: self.max_match_size,
            });
        }
        if self.scan_interval.is_zero() {
            return Err(ConfigError::ZeroScanInterval);
        }
        Ok(())
    }

    pub fn accepts(
        &self,
        group: &[Entry<P>],
    ) -> bool {
        (self.compatibility)(group)
    }

    pub fn compare(
        &self,
        a: &Entry<P>,
        b: &Entry<P>,
    ) -> Ordering {
        (self.ordering)(a, b)
    }
}
