//! The worker facade: one object wiring registry, router, sweeper,
//! lifecycle and clients together behind the event-facing API.
//!
//! The host runtime owns a `CacheWorker` and forwards its lifecycle and
//! fetch events into it (usually through
//! [`EventRuntime`](crate::runtime::EventRuntime), which adds the
//! keep-alive guarantee). The worker holds no per-request state of its
//! own; the store registry is the only shared resource.

use crate::clients::Clients;
use crate::config::WorkerConfig;
use crate::error::Result;
use crate::fetch::{Fetch, HttpFetcher};
use crate::lifecycle::{LifecycleController, WorkerState};
use crate::models::{Request, Response};
use crate::router::RequestRouter;
use crate::runtime::{ControlMessage, VersionReply};
use crate::store::{StoreId, StoreRegistry};
use crate::sweep::Sweeper;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

pub struct CacheWorker {
    registry: StoreRegistry,
    clients: Clients,
    router: RequestRouter,
    lifecycle: LifecycleController,
    shell_id: StoreId,
}

impl CacheWorker {
    /// Build a worker over an arbitrary network seam.
    pub fn new(config: WorkerConfig, fetcher: Arc<dyn Fetch>) -> Self {
        let registry = StoreRegistry::new();
        let clients = Clients::new();
        let shell_id = StoreId::new(&config.shell.name, &config.shell.version);
        let data_id = StoreId::new(&config.data.name, &config.data.version);

        let router = RequestRouter::new(
            registry.clone(),
            Arc::clone(&fetcher),
            shell_id.clone(),
            data_id.clone(),
            config.routing.clone(),
        );
        let lifecycle = LifecycleController::new(
            registry.clone(),
            fetcher,
            clients.clone(),
            shell_id.clone(),
            data_id,
            config.shell.precache.clone(),
            Sweeper::new(config.data.capacity),
        );

        Self {
            registry,
            clients,
            router,
            lifecycle,
            shell_id,
        }
    }

    /// Build a worker backed by the live HTTP fetcher.
    pub fn with_http_fetcher(config: WorkerConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);
        Ok(Self::new(config, fetcher))
    }

    /// Install trigger: provision the app shell. A failure is surfaced to
    /// the host, which retries the install later.
    pub async fn handle_install(&self) -> Result<()> {
        self.lifecycle.install().await
    }

    /// Activate trigger: stale-store cleanup, data-store sweep, client
    /// takeover.
    pub async fn handle_activate(&self) -> Result<()> {
        self.lifecycle.activate().await
    }

    /// Fetch interception. `Ok(None)` declines interception and lets the
    /// request fall through to default network handling; a worker that is
    /// not yet active declines everything.
    pub async fn handle_fetch(&self, request: &Request) -> Result<Option<Response>> {
        if self.lifecycle.state().await != WorkerState::Active {
            debug!(url = %request.url, "not active, declining interception");
            return Ok(None);
        }
        self.router.route(request).await
    }

    /// Inbound control message. Unrecognized payloads are ignored
    /// silently; `GET_VERSION` answers on the provided reply channel.
    pub async fn handle_message(&self, payload: Value, reply: Option<oneshot::Sender<Value>>) {
        match ControlMessage::parse(&payload) {
            Some(ControlMessage::SkipWaiting) => {
                if let Err(e) = self.lifecycle.skip_waiting().await {
                    warn!(error = %e, "skip-waiting promotion failed");
                }
            }
            Some(ControlMessage::GetVersion) => {
                let body = VersionReply {
                    version: self.version(),
                };
                if let Some(reply) = reply {
                    // A dropped receiver just means nobody is listening.
                    let _ = reply.send(serde_json::json!(body));
                }
            }
            None => {
                debug!("ignoring unrecognized message");
            }
        }
    }

    /// Qualified identity of the app-shell store, doubling as the worker
    /// version string.
    pub fn version(&self) -> String {
        self.shell_id.qualified()
    }

    pub async fn state(&self) -> WorkerState {
        self.lifecycle.state().await
    }

    /// Client sessions, for the host to register page opens/closes.
    pub fn clients(&self) -> &Clients {
        &self.clients
    }

    /// Direct store access, for the host's own bookkeeping.
    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }
}
