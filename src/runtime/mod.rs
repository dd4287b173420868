//! Event dispatch for the worker.
//!
//! The host runtime delivers external events — install, activate, fetch
//! interception, control messages — as values of [`WorkerEvent`] and the
//! [`EventRuntime`] maps each to its handler. An event is not considered
//! handled until the keep-alive guard around its handler has settled; the
//! dispatch table plus guard is what stands between a long-running install
//! and the host tearing the task down mid-write.

mod guard;
mod messages;

pub use guard::EventGuard;
pub use messages::{ControlMessage, VersionReply};

use crate::error::Result;
use crate::models::{Request, Response};
use crate::worker::CacheWorker;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::debug;

/// External events the host runtime can deliver.
pub enum WorkerEvent {
    /// Lifecycle install trigger, no payload.
    Install,
    /// Lifecycle activate trigger, no payload.
    Activate,
    /// An intercepted outbound request.
    Fetch(Request),
    /// A control message from a host page, with an optional reply channel.
    Message {
        payload: Value,
        reply: Option<oneshot::Sender<Value>>,
    },
}

/// What dispatching an event produced.
#[derive(Debug)]
pub enum EventOutcome {
    /// The event ran to completion with nothing to hand back.
    Completed,
    /// A fetch event's answer; `None` declines interception and the
    /// request falls through to default network handling.
    Response(Option<Response>),
}

pub struct EventRuntime {
    worker: Arc<CacheWorker>,
}

impl EventRuntime {
    pub fn new(worker: Arc<CacheWorker>) -> Self {
        Self { worker }
    }

    pub fn worker(&self) -> &Arc<CacheWorker> {
        &self.worker
    }

    /// Dispatch one event to its handler and hold the event open until the
    /// handler's work has settled.
    pub async fn dispatch(&self, event: WorkerEvent) -> Result<EventOutcome> {
        match event {
            WorkerEvent::Install => {
                let mut guard = EventGuard::new();
                let worker = Arc::clone(&self.worker);
                guard.wait_until(async move { worker.handle_install().await });
                guard.settle().await?;
                Ok(EventOutcome::Completed)
            }
            WorkerEvent::Activate => {
                let mut guard = EventGuard::new();
                let worker = Arc::clone(&self.worker);
                guard.wait_until(async move { worker.handle_activate().await });
                guard.settle().await?;
                Ok(EventOutcome::Completed)
            }
            WorkerEvent::Fetch(request) => {
                debug!(url = %request.url, "fetch event");
                // The router writes its cache duplicate before the handler
                // resolves, so awaiting the handler is the keep-alive here.
                let response = self.worker.handle_fetch(&request).await?;
                Ok(EventOutcome::Response(response))
            }
            WorkerEvent::Message { payload, reply } => {
                let mut guard = EventGuard::new();
                let worker = Arc::clone(&self.worker);
                guard.wait_until(async move {
                    worker.handle_message(payload, reply).await;
                    Ok(())
                });
                guard.settle().await?;
                Ok(EventOutcome::Completed)
            }
        }
    }
}
