use std::cmp::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Mutex as TokioMutex;

use domain::{Entry, MatchmakingConfig};

use super::error::MatchmakerError;
use super::matchmaker::{KeyFn, Matchmaker};
use crate::ports::out_::{Clock, GroupResolver, LocalQueueStore, QueueStore, SystemClock};

/// Collects the capabilities and settings of a [`Matchmaker`].
///
/// A resolver and a key extractor are required; everything else has a default. Without a custom
/// store the queue is kept in memory, seeded with [`initial_queue`](Self::initial_queue).
pub struct MatchmakerBuilder<P, K>
where
    P: Send + Sync + 'static,
{
    config: MatchmakingConfig<P>,
    resolver: Option<Arc<dyn GroupResolver<P>>>,
    key: Option<KeyFn<P, K>>,
    store: Option<Arc<dyn QueueStore<P>>>,
    clock: Option<Arc<dyn Clock>>,
    initial_queue: Vec<Entry<P>>,
}

impl<P, K> MatchmakerBuilder<P, K>
where
    P: Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MatchmakingConfig::default(),
            resolver: None,
            key: None,
            store: None,
            clock: None,
            initial_queue: Vec::new(),
        }
    }

    #[must_use]
    pub fn resolver(
        self,
        resolver: impl Fn(Vec<Entry<P>>) + Send + Sync + 'static,
    ) -> Self {
        self.group_resolver(Arc::new(resolver))
    }

    #[must_use]
    pub fn group_resolver(
        mut self,
        resolver: Arc<dyn GroupResolver<P>>,
    ) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn key(
        mut self,
        key: impl Fn(&P) -> K + Send + Sync + 'static,
    ) -> Self {
        let key: KeyFn<P, K> = Arc::new(key);
        self.key = Some(key);
        self
    }

    /// Replaces every setting at once, including both predicates.
    #[must_use]
    pub fn config(
        mut self,
        config: MatchmakingConfig<P>,
    ) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn scan_interval(
        mut self,
        interval: Duration,
    ) -> Self {
        self.config.scan_interval = interval;
        self
    }

    #[must_use]
    pub fn min_match_size(
        mut self,
        size: usize,
    ) -> Self {
        self.config.min_match_size = size;
        self
    }

    #[must_use]
    pub fn max_match_size(
        mut self,
        size: usize,
    ) -> Self {
        self.config.max_match_size = size;
        self
    }

    #[must_use]
    pub fn compatibility(
        mut self,
        compatibility: impl Fn(&[Entry<P>]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.config.compatibility = Arc::new(compatibility);
        self
    }

    #[must_use]
    pub fn ordering(
        mut self,
        ordering: impl Fn(&Entry<P>, &Entry<P>) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.config.ordering = Arc::new(ordering);
        self
    }

    #[must_use]
    pub fn initial_queue(
        mut self,
        queue: Vec<Entry<P>>,
    ) -> Self {
        self.initial_queue = queue;
        self
    }

    #[must_use]
    pub fn store(
        mut self,
        store: Arc<dyn QueueStore<P>>,
    ) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn clock(
        mut self,
        clock: Arc<dyn Clock>,
    ) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<Matchmaker<P, K>, MatchmakerError>
    where
        P: Clone,
    {
        let resolver = self
            .resolver
            .ok_or_else(|| MatchmakerError::InvalidArgument("a resolver is required".to_string()))?;
        let key = self
            .key
            .ok_or_else(|| MatchmakerError::InvalidArgument("a key extractor is required".to_string()))?;
        self.config.validate()?;

        let store: Arc<dyn QueueStore<P>> = match self.store {
            Some(_) if !self.initial_queue.is_empty() => {
                return Err(MatchmakerError::InvalidArgument(
                    "an initial queue cannot be combined with a custom store".to_string(),
                ));
            }
            Some(store) => store,
            None => Arc::new(LocalQueueStore::with_entries(self.initial_queue)),
        };

        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock::new()),
        };

        Ok(Matchmaker {
            config: self.config,
            store,
            resolver,
            key,
            clock,
            gate: TokioMutex::new(()),
            scan_task: Mutex::new(None),
        })
    }
}

impl<P, K> Default for MatchmakerBuilder<P, K>
where
    P: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
