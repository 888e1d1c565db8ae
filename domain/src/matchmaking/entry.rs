use serde::{Deserialize, Serialize};

/// A queued participant and the moment (ms since the UNIX epoch) it joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<P> {
    pub player: P,
    pub added_at: u64,
}

impl<P> Entry<P> {
    #[must_use]
    pub fn new(
        player: P,
        added_at: u64,
    ) -> Self {
        Self { player, added_at }
    }
}
