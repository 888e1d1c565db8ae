use super::{Entry, MatchmakingConfig};

/// Result of planning a scan without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan<P> {
    /// Groups in the order they were dispatched (highest chunk first).
    pub dispatched: Vec<Vec<Entry<P>>>,
    pub remaining: Vec<Entry<P>>,
}

/// Stable sort by the configured ordering; ties keep their queue order.
pub fn sort_queue<P>(
    queue: &mut [Entry<P>],
    config: &MatchmakingConfig<P>,
) {
    queue.sort_by(|a, b| config.compare(a, b));
}

/// Splits the queue into consecutive chunks of `chunk_size`, the last one possibly shorter.
pub fn chunk_queue<P>(
    queue: Vec<Entry<P>>,
    chunk_size: usize,
) -> Vec<Vec<Entry<P>>> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(queue.len().div_ceil(chunk_size));
    let mut entries = queue.into_iter();
    loop {
        let chunk: Vec<Entry<P>> = entries.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }
    chunks
}

/// Runs one scan over `queue`, handing every accepted group to `dispatch` as soon as it is
/// accepted. Returns the entries that stay queued, re-sorted.
///
/// Chunks are visited from the last one to the first so that removing an accepted chunk never
/// shifts a chunk that is still waiting to be evaluated.
pub fn scan_queue<P, F>(
    mut queue: Vec<Entry<P>>,
    config: &MatchmakingConfig<P>,
    mut dispatch: F,
) -> Vec<Entry<P>>
where
    F: FnMut(Vec<Entry<P>>),
{
    sort_queue(&mut queue, config);
    let mut groups = chunk_queue(queue, config.max_match_size);

    for index in (0..groups.len()).rev() {
        let group = &groups[index];
        if group.len() < config.min_match_size {
            continue;
        }
        if config.accepts(group) {
            dispatch(groups.remove(index));
        }
    }

    let mut remaining: Vec<Entry<P>> = groups.into_iter().flatten().collect();
    sort_queue(&mut remaining, config);
    remaining
}

pub fn plan_scan<P>(
    queue: Vec<Entry<P>>,
    config: &MatchmakingConfig<P>,
) -> ScanPlan<P> {
    let mut dispatched = Vec::new();
    let remaining = scan_queue(queue, config, |group| dispatched.push(group));
    ScanPlan { dispatched, remaining }
}
