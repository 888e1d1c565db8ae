use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as TokioMutex;
use tracing::{debug, info};

use domain::{Entry, MatchmakingConfig, scan_queue};

use super::builder::MatchmakerBuilder;
use super::error::MatchmakerError;
use super::scheduler::ScanTask;
use crate::ports::out_::{Clock, GroupResolver, QueueStore};

/// Derives the identity used for lookup and removal from a participant.
pub type KeyFn<P, K> = Arc<dyn Fn(&P) -> K + Send + Sync>;

/// What a single scan did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanReport {
    pub scanned: usize,
    pub dispatched_groups: usize,
    pub dispatched_players: usize,
    pub remaining: usize,
}

pub struct Matchmaker<P, K>
where
    P: Send + Sync + 'static,
{
    pub(super) config: MatchmakingConfig<P>,
    pub(super) store: Arc<dyn QueueStore<P>>,
    pub(super) resolver: Arc<dyn GroupResolver<P>>,
    pub(super) key: KeyFn<P, K>,
    pub(super) clock: Arc<dyn Clock>,
    /// Serializes scans and queue mutations issued through this matchmaker.
    pub(super) gate: TokioMutex<()>,
    pub(super) scan_task: Mutex<Option<ScanTask>>,
}

impl<P, K> Matchmaker<P, K>
where
    P: Send + Sync + 'static,
{
    #[must_use]
    pub fn builder() -> MatchmakerBuilder<P, K> {
        MatchmakerBuilder::new()
    }

    pub fn config(&self) -> &MatchmakingConfig<P> {
        &self.config
    }

    /// Runs one scan to completion: read, sort, chunk, dispatch accepted groups, write back the
    /// rest.
    ///
    /// The resolver is called while the scan is in progress, once per accepted group, before the
    /// remainder is written. A store failure aborts the scan; groups already handed to the
    /// resolver stay dispatched.
    pub async fn run_scan(&self) -> Result<ScanReport, MatchmakerError> {
        let _gate = self.gate.lock().await;
        let queue = self.store.read().await?;

        let mut report = ScanReport {
            scanned: queue.len(),
            ..ScanReport::default()
        };
        let remaining = scan_queue(queue, &self.config, |group| {
            report.dispatched_groups += 1;
            report.dispatched_players += group.len();
            info!(size = group.len(), "Dispatching matched group");
            self.resolver.resolve(group);
        });
        report.remaining = remaining.len();

        self.store.write(remaining).await?;
        debug!(
            scanned = report.scanned,
            groups = report.dispatched_groups,
            remaining = report.remaining,
            "Scan complete"
        );
        Ok(report)
    }

    /// Appends `player` to the end of the queue. No de-duplication is done.
    pub async fn add_player(
        &self,
        player: P,
    ) -> Result<Entry<P>, MatchmakerError>
    where
        P: Clone,
    {
        let _gate = self.gate.lock().await;
        let mut queue = self.store.read().await?;
        let entry = Entry::new(player, self.clock.now_millis());
        queue.push(entry.clone());
        self.store.write(queue).await?;
        Ok(entry)
    }

    pub async fn remove_player_by_index(
        &self,
        index: usize,
    ) -> Result<Option<Entry<P>>, MatchmakerError> {
        let _gate = self.gate.lock().await;
        let mut queue = self.store.read().await?;
        if index >= queue.len() {
            return Ok(None);
        }
        let removed = queue.remove(index);
        self.store.write(queue).await?;
        Ok(Some(removed))
    }

    pub async fn get_player_by_index(
        &self,
        index: usize,
    ) -> Result<Option<Entry<P>>, MatchmakerError> {
        let _gate = self.gate.lock().await;
        let queue = self.store.read().await?;
        Ok(queue.into_iter().nth(index))
    }

    pub async fn queue_snapshot(&self) -> Result<Vec<Entry<P>>, MatchmakerError> {
        let _gate = self.gate.lock().await;
        Ok(self.store.read().await?)
    }

    pub async fn len(&self) -> Result<usize, MatchmakerError> {
        Ok(self.queue_snapshot().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool, MatchmakerError> {
        Ok(self.len().await? == 0)
    }
}

impl<P, K> Matchmaker<P, K>
where
    P: Send + Sync + 'static,
    K: PartialEq,
{
    fn position_of(
        &self,
        queue: &[Entry<P>],
        id: &K,
    ) -> Option<usize> {
        queue.iter().position(|entry| (self.key)(&entry.player) == *id)
    }

    /// Removes the first entry whose key equals `id`.
    pub async fn remove_player_by_id(
        &self,
        id: &K,
    ) -> Result<Option<Entry<P>>, MatchmakerError> {
        let _gate = self.gate.lock().await;
        let mut queue = self.store.read().await?;
        let Some(index) = self.position_of(&queue, id) else {
            return Ok(None);
        };
        let removed = queue.remove(index);
        self.store.write(queue).await?;
        Ok(Some(removed))
    }

    pub async fn get_player_by_id(
        &self,
        id: &K,
    ) -> Result<Option<Entry<P>>, MatchmakerError> {
        let _gate = self.gate.lock().await;
        let queue = self.store.read().await?;
        let index = self.position_of(&queue, id);
        Ok(index.and_then(|index| queue.into_iter().nth(index)))
    }
}
