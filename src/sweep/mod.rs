//! Eviction sweeper: one-shot capacity enforcement for the data store.
//!
//! Victim selection is deterministic and content-derived: keys are ordered
//! lexicographically by URL and the smallest `count - capacity` keys are
//! deleted. No access time is tracked; this is intentionally not an LRU.
//! Victim deletions are independent and run unordered; a partial sweep is
//! never rolled back.

use crate::store::StoreHandle;
use futures::future::join_all;
use tracing::{debug, info};

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Entry count before the sweep.
    pub scanned: usize,
    /// Victims actually deleted.
    pub evicted: usize,
}

pub struct Sweeper {
    capacity: usize,
}

impl Sweeper {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Bound the store to at most `capacity` entries. Invoked once per
    /// activation cycle, not per request.
    pub async fn sweep(&self, store: &StoreHandle) -> SweepReport {
        let mut keys = store.keys().await;
        let scanned = keys.len();

        if scanned <= self.capacity {
            debug!(store = store.name(), scanned, "sweep: under capacity, no-op");
            return SweepReport { scanned, evicted: 0 };
        }

        keys.sort_by(|a, b| a.url.cmp(&b.url));
        let victims: Vec<_> = keys.into_iter().take(scanned - self.capacity).collect();

        let deletions = victims.iter().map(|key| store.delete(key));
        let evicted = join_all(deletions).await.into_iter().filter(|d| *d).count();

        info!(store = store.name(), scanned, evicted, "sweep completed");
        SweepReport { scanned, evicted }
    }
}
