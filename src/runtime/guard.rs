// Keep-alive guard for event handlers

use crate::error::Result;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::future::Future;
use tracing::warn;

/// Holds an event open until every piece of work registered on it has run
/// to completion.
///
/// The host runtime may abort a handler whose triggering event is not
/// explicitly held open; any asynchronous chain a handler starts must be
/// registered here, and the dispatcher settles the guard before treating
/// the event as handled. Skipping the guard would let the task terminate
/// mid-write and leave the cache inconsistent.
#[derive(Default)]
pub struct EventGuard {
    pending: FuturesUnordered<BoxFuture<'static, Result<()>>>,
}

impl EventGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the event's lifetime until `work` completes.
    pub fn wait_until<F>(&mut self, work: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.pending.push(work.boxed());
    }

    /// Drive all registered work to completion. Every future runs even if
    /// an earlier one fails; the first failure is returned once all have
    /// settled, the rest are logged.
    pub async fn settle(mut self) -> Result<()> {
        let mut first_failure = None;
        while let Some(result) = self.pending.next().await {
            if let Err(e) = result {
                if first_failure.is_none() {
                    first_failure = Some(e);
                } else {
                    warn!(error = %e, "additional failure while settling event");
                }
            }
        }
        match first_failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
