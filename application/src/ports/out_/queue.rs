use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use domain::Entry;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("queue store unavailable: {0}")]
    Unavailable(String),

    #[error("queue store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("queue data is corrupt: {0}")]
    Corrupt(String),

    #[error("queue could not be encoded: {0}")]
    Encode(String),
}

/// Where the waiting queue actually lives. Both operations may suspend, so the queue can sit in
/// a remote or file-backed store as easily as in memory.
#[async_trait]
pub trait QueueStore<P: Send + Sync + 'static>: Send + Sync {
    async fn read(&self) -> Result<Vec<Entry<P>>, StoreError>;

    async fn write(
        &self,
        queue: Vec<Entry<P>>,
    ) -> Result<(), StoreError>;
}

/// The default store: the queue held in process memory.
pub struct LocalQueueStore<P> {
    queue: RwLock<Vec<Entry<P>>>,
}

impl<P> LocalQueueStore<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    #[must_use]
    pub fn with_entries(entries: Vec<Entry<P>>) -> Self {
        Self {
            queue: RwLock::new(entries),
        }
    }
}

impl<P> Default for LocalQueueStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<P> QueueStore<P> for LocalQueueStore<P>
where
    P: Clone + Send + Sync + 'static,
{
    async fn read(&self) -> Result<Vec<Entry<P>>, StoreError> {
        Ok(self.queue.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn write(
        &self,
        queue: Vec<Entry<P>>,
    ) -> Result<(), StoreError> {
        *self.queue.write().unwrap_or_else(PoisonError::into_inner) = queue;
        Ok(())
    }
}
