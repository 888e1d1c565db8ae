use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use domain::Entry;

#[derive(Debug, Clone, Serialize)]
pub struct LaunchedMatch<P> {
    pub match_id: Uuid,
    pub players: Vec<Entry<P>>,
}

/// Launches matches by recording them, keeping the most recent `capacity` around for inspection.
pub struct MatchLog<P> {
    matches: RwLock<VecDeque<LaunchedMatch<P>>>,
    capacity: usize,
}

impl<P> MatchLog<P> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            matches: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn record(
        &self,
        players: Vec<Entry<P>>,
    ) -> Uuid {
        let match_id = Uuid::new_v4();
        info!(match_id = %match_id, players = players.len(), "Match launched");

        let mut matches = self.matches.write().unwrap_or_else(PoisonError::into_inner);
        matches.push_back(LaunchedMatch { match_id, players });
        while matches.len() > self.capacity {
            matches.pop_front();
        }
        match_id
    }

    pub fn len(&self) -> usize {
        self.matches.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P: Clone> MatchLog<P> {
    /// Oldest first.
    pub fn recent(&self) -> Vec<LaunchedMatch<P>> {
        self.matches.read().unwrap_or_else(PoisonError::into_inner).iter().cloned().collect()
    }
}
