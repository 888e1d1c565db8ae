use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use domain::Entry;

use super::{Matchmaker, MatchmakerBuilder, MatchmakerError};
use crate::ports::out_::{LocalQueueStore, ManualClock, QueueStore, StoreError};

#[derive(Debug, Clone, PartialEq)]
struct Player {
    id: u32,
    rating: u32,
}

fn player(id: u32) -> Player {
    Player { id, rating: 1_000 }
}

fn ids(entries: &[Entry<Player>]) -> Vec<u32> {
    entries.iter().map(|e| e.player.id).collect()
}

type Groups = Arc<Mutex<Vec<Vec<Entry<Player>>>>>;

struct Harness {
    matchmaker: Arc<Matchmaker<Player, u32>>,
    groups: Groups,
    clock: Arc<ManualClock>,
}

impl Harness {
    fn new() -> Self {
        Self::with(|builder| builder)
    }

    fn with(configure: impl FnOnce(MatchmakerBuilder<Player, u32>) -> MatchmakerBuilder<Player, u32>) -> Self {
        let groups: Groups = Arc::default();
        let clock = Arc::new(ManualClock::new(1_000));
        let recorded = Arc::clone(&groups);
        let builder = Matchmaker::<Player, u32>::builder()
            .resolver(move |group| recorded.lock().unwrap().push(group))
            .key(|player: &Player| player.id)
            .clock(clock.clone());
        let matchmaker = configure(builder).build().unwrap();
        Self {
            matchmaker: Arc::new(matchmaker),
            groups,
            clock,
        }
    }

    async fn add(
        &self,
        player_ids: impl IntoIterator<Item = u32>,
    ) {
        for id in player_ids {
            self.matchmaker.add_player(player(id)).await.unwrap();
            self.clock.advance(1);
        }
    }

    fn dispatched(&self) -> Vec<Vec<u32>> {
        self.groups.lock().unwrap().iter().map(|g| ids(g)).collect()
    }

    async fn queued(&self) -> Vec<u32> {
        ids(&self.matchmaker.queue_snapshot().await.unwrap())
    }
}

/// Delegates to an in-memory queue but can be told to fail the next few reads.
struct FlakyStore {
    inner: LocalQueueStore<Player>,
    failing_reads: AtomicUsize,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: LocalQueueStore::new(),
            failing_reads: AtomicUsize::new(0),
        }
    }

    fn fail_next_reads(
        &self,
        count: usize,
    ) {
        self.failing_reads.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl QueueStore<Player> for FlakyStore {
    async fn read(&self) -> Result<Vec<Entry<Player>>, StoreError> {
        if self.failing_reads.load(Ordering::SeqCst) > 0 {
            self.failing_reads.fetch_sub(1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("store offline".to_string()));
        }
        self.inner.read().await
    }

    async fn write(
        &self,
        queue: Vec<Entry<Player>>,
    ) -> Result<(), StoreError> {
        self.inner.write(queue).await
    }
}

/// Delegates to an in-memory queue, counting calls. Reads can be slowed down to keep a scan in
/// flight across a tick.
struct SlowStore {
    inner: LocalQueueStore<Player>,
    read_delay_ms: AtomicU64,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl SlowStore {
    fn new() -> Self {
        Self {
            inner: LocalQueueStore::new(),
            read_delay_ms: AtomicU64::new(0),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Slows every later read and restarts the call counts.
    fn delay_reads(
        &self,
        delay: Duration,
    ) {
        self.read_delay_ms.store(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), Ordering::SeqCst);
        self.reads.store(0, Ordering::SeqCst);
        self.writes.store(0, Ordering::SeqCst);
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueueStore<Player> for SlowStore {
    async fn read(&self) -> Result<Vec<Entry<Player>>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let delay = self.read_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.inner.read().await
    }

    async fn write(
        &self,
        queue: Vec<Entry<Player>>,
    ) -> Result<(), StoreError> {
        self.inner.write(queue).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn build_requires_resolver() {
    let result = Matchmaker::<Player, u32>::builder().key(|p: &Player| p.id).build();
    assert!(matches!(result, Err(MatchmakerError::InvalidArgument(_))));
}

#[test]
fn build_requires_key_extractor() {
    let result = Matchmaker::<Player, u32>::builder().resolver(|_| {}).build();
    assert!(matches!(result, Err(MatchmakerError::InvalidArgument(_))));
}

#[test]
fn built_matchmaker_exposes_its_config() {
    let harness = Harness::with(|builder| {
        builder
            .scan_interval(Duration::from_millis(250))
            .min_match_size(3)
            .max_match_size(4)
    });

    let config = harness.matchmaker.config();
    assert_eq!(config.scan_interval, Duration::from_millis(250));
    assert_eq!((config.min_match_size, config.max_match_size), (3, 4));
}

#[test]
fn build_rejects_min_above_max() {
    let result = Matchmaker::<Player, u32>::builder()
        .resolver(|_| {})
        .key(|p: &Player| p.id)
        .min_match_size(4)
        .max_match_size(3)
        .build();
    assert!(matches!(result, Err(MatchmakerError::InvalidArgument(_))));
}

#[test]
fn build_rejects_initial_queue_with_custom_store() {
    let result = Matchmaker::<Player, u32>::builder()
        .resolver(|_| {})
        .key(|p: &Player| p.id)
        .initial_queue(vec![Entry::new(player(1), 1)])
        .store(Arc::new(LocalQueueStore::new()))
        .build();
    assert!(matches!(result, Err(MatchmakerError::InvalidArgument(_))));
}

#[tokio::test]
async fn initial_queue_seeds_memory_store() {
    let seeded = vec![Entry::new(player(7), 10), Entry::new(player(8), 20)];
    let harness = Harness::with(|builder| builder.initial_queue(seeded));

    assert_eq!(harness.queued().await, vec![7, 8]);
    assert_eq!(harness.matchmaker.get_player_by_id(&8).await.unwrap().map(|e| e.added_at), Some(20));
}

#[tokio::test]
async fn two_players_are_matched_with_defaults() {
    let harness = Harness::new();
    harness.add([0, 1]).await;

    let report = harness.matchmaker.run_scan().await.unwrap();

    assert_eq!(report.scanned, 2);
    assert_eq!(report.dispatched_groups, 1);
    assert_eq!(report.dispatched_players, 2);
    assert_eq!(report.remaining, 0);
    assert_eq!(harness.dispatched(), vec![vec![0, 1]]);
    assert!(harness.matchmaker.is_empty().await.unwrap());
}

#[tokio::test]
async fn resolver_receives_join_times() {
    let harness = Harness::new();
    harness.add([0, 1]).await;
    harness.matchmaker.run_scan().await.unwrap();

    let groups = harness.groups.lock().unwrap();
    let joined: Vec<u64> = groups[0].iter().map(|e| e.added_at).collect();
    assert_eq!(joined, vec![1_000, 1_001]);
}

#[tokio::test]
async fn only_last_chunk_is_dispatched_when_it_alone_is_accepted() {
    let harness = Harness::with(|builder| {
        builder
            .min_match_size(2)
            .max_match_size(2)
            .compatibility(|group| group[0].player.id == 2)
    });
    harness.add(0..4).await;

    harness.matchmaker.run_scan().await.unwrap();

    assert_eq!(harness.dispatched(), vec![vec![2, 3]]);
    assert_eq!(harness.queued().await, vec![0, 1]);
}

#[tokio::test]
async fn rejected_players_wait_for_the_next_scan() {
    let harness = Harness::with(|builder| builder.compatibility(|group| group.iter().all(|e| e.player.rating > 1_500)));
    harness.add(0..3).await;

    let report = harness.matchmaker.run_scan().await.unwrap();

    assert_eq!(report.dispatched_groups, 0);
    assert!(harness.dispatched().is_empty());
    assert_eq!(harness.queued().await, vec![0, 1, 2]);
}

#[tokio::test]
async fn ordering_groups_similar_ratings() {
    let harness = Harness::with(|builder| {
        builder
            .min_match_size(2)
            .max_match_size(2)
            .ordering(|a, b| a.player.rating.cmp(&b.player.rating))
            .compatibility(|group| group[1].player.rating - group[0].player.rating <= 100)
    });
    for (id, rating) in [(0, 1_000), (1, 2_000), (2, 1_050), (3, 1_990)] {
        harness.matchmaker.add_player(Player { id, rating }).await.unwrap();
    }

    harness.matchmaker.run_scan().await.unwrap();

    assert_eq!(harness.dispatched(), vec![vec![3, 1], vec![0, 2]]);
}

#[tokio::test]
async fn add_player_stamps_clock_time() {
    let harness = Harness::new();

    let first = harness.matchmaker.add_player(player(0)).await.unwrap();
    harness.clock.advance(250);
    let second = harness.matchmaker.add_player(player(1)).await.unwrap();

    assert_eq!(first.added_at, 1_000);
    assert_eq!(second.added_at, 1_250);
    assert_eq!(harness.matchmaker.len().await.unwrap(), 2);
}

#[tokio::test]
async fn removing_unknown_id_returns_none() {
    let harness = Harness::new();
    harness.add([0, 1]).await;

    let removed = harness.matchmaker.remove_player_by_id(&99).await.unwrap();

    assert!(removed.is_none());
    assert_eq!(harness.matchmaker.len().await.unwrap(), 2);
}

#[tokio::test]
async fn removing_known_id_returns_entry() {
    let harness = Harness::new();
    harness.add([0, 1]).await;

    let removed = harness.matchmaker.remove_player_by_id(&0).await.unwrap();

    assert_eq!(removed, Some(Entry::new(player(0), 1_000)));
    assert_eq!(harness.queued().await, vec![1]);
}

#[tokio::test]
async fn duplicate_ids_are_kept_and_removed_one_at_a_time() {
    let harness = Harness::new();
    harness.add([5, 5]).await;
    assert_eq!(harness.matchmaker.len().await.unwrap(), 2);

    let removed = harness.matchmaker.remove_player_by_id(&5).await.unwrap();

    assert_eq!(removed.map(|e| e.added_at), Some(1_000));
    assert_eq!(harness.matchmaker.len().await.unwrap(), 1);
}

#[tokio::test]
async fn index_operations_respect_bounds() {
    let harness = Harness::new();
    harness.add(0..3).await;

    assert!(harness.matchmaker.get_player_by_index(3).await.unwrap().is_none());
    assert_eq!(harness.matchmaker.get_player_by_index(1).await.unwrap().map(|e| e.player.id), Some(1));
    assert!(harness.matchmaker.remove_player_by_index(3).await.unwrap().is_none());
    assert_eq!(harness.matchmaker.len().await.unwrap(), 3);

    let removed = harness.matchmaker.remove_player_by_index(0).await.unwrap();
    assert_eq!(removed.map(|e| e.player.id), Some(0));
    assert!(harness.matchmaker.get_player_by_id(&0).await.unwrap().is_none());
    assert_eq!(harness.matchmaker.get_player_by_id(&2).await.unwrap().map(|e| e.player.id), Some(2));
}

#[tokio::test]
async fn concurrent_adds_are_all_kept() {
    let harness = Harness::new();

    let results = futures::future::join_all((0..20).map(|id| harness.matchmaker.add_player(player(id)))).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(harness.matchmaker.len().await.unwrap(), 20);
}

#[tokio::test]
async fn scan_surfaces_store_failure() {
    let store = Arc::new(FlakyStore::new());
    let harness = Harness::with(|builder| builder.store(store.clone()));
    harness.add([0, 1]).await;
    store.fail_next_reads(1);

    let result = harness.matchmaker.run_scan().await;

    assert!(matches!(result, Err(MatchmakerError::Store(StoreError::Unavailable(_)))));
    assert!(harness.dispatched().is_empty());
    assert_eq!(harness.queued().await, vec![0, 1]);
}

#[tokio::test(start_paused = true)]
async fn scans_run_every_interval_until_stopped() {
    let harness = Harness::with(|builder| builder.scan_interval(Duration::from_millis(1_000)));
    harness.matchmaker.start().unwrap();
    assert!(harness.matchmaker.is_running());
    harness.add([0, 1]).await;

    tokio::time::sleep(Duration::from_millis(999)).await;
    assert!(harness.dispatched().is_empty());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(harness.dispatched(), vec![vec![0, 1]]);

    harness.add([2, 3]).await;
    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(harness.dispatched(), vec![vec![0, 1], vec![2, 3]]);

    assert!(harness.matchmaker.stop().await);
    assert!(!harness.matchmaker.is_running());

    harness.add([4, 5]).await;
    tokio::time::sleep(Duration::from_millis(5_000)).await;
    assert_eq!(harness.dispatched().len(), 2);
    assert_eq!(harness.queued().await, vec![4, 5]);
}

#[tokio::test(start_paused = true)]
async fn start_twice_is_rejected() {
    let harness = Harness::new();

    harness.matchmaker.start().unwrap();
    assert!(matches!(harness.matchmaker.start(), Err(MatchmakerError::AlreadyRunning)));

    assert!(harness.matchmaker.stop().await);
    assert!(!harness.matchmaker.stop().await);

    harness.matchmaker.start().unwrap();
    assert!(harness.matchmaker.stop().await);
}

#[tokio::test(start_paused = true)]
async fn failed_tick_does_not_stop_later_ticks() {
    let store = Arc::new(FlakyStore::new());
    let harness = Harness::with(|builder| builder.store(store.clone()).scan_interval(Duration::from_millis(1_000)));
    harness.add([0, 1]).await;
    store.fail_next_reads(1);
    harness.matchmaker.start().unwrap();

    tokio::time::sleep(Duration::from_millis(1_001)).await;
    assert!(harness.dispatched().is_empty());

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(harness.dispatched(), vec![vec![0, 1]]);

    harness.matchmaker.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_finishes_the_running_scan_and_starts_no_other() {
    let store = Arc::new(SlowStore::new());
    let harness = Harness::with(|builder| builder.store(store.clone()).scan_interval(Duration::from_millis(1_000)));
    harness.add([0, 1]).await;
    store.delay_reads(Duration::from_millis(1_500));
    harness.matchmaker.start().unwrap();

    // The first scan starts at 1s and is still reading when stop is called; the 2s tick comes
    // due while it runs.
    tokio::time::sleep(Duration::from_millis(1_200)).await;
    assert_eq!(store.reads(), 1);
    assert_eq!(store.writes(), 0);

    assert!(harness.matchmaker.stop().await);

    assert_eq!(store.reads(), 1);
    assert_eq!(store.writes(), 1);
    assert_eq!(harness.dispatched(), vec![vec![0, 1]]);
    assert!(store.inner.read().await.unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(5_000)).await;
    assert_eq!(store.reads(), 1);
    assert_eq!(store.writes(), 1);
}
