//! Lifecycle controller: install and activate transitions.
//!
//! States move `Uninstalled -> Installing -> Waiting -> Activating ->
//! Active`, with guarded transitions. Install provisions the app-shell
//! store from the precache manifest as an all-or-nothing batch; a failed
//! install surfaces the error to the host (which is expected to retry) and
//! never promotes a partial version, though entries written before the
//! failure may persist as a side effect. Activation deletes superseded
//! stores, sweeps the data store and claims all open clients; failures
//! there are logged and never block activation.

mod state;

pub use state::WorkerState;

use crate::clients::Clients;
use crate::error::{Result, WorkerError};
use crate::fetch::Fetch;
use crate::models::Request;
use crate::store::{CacheKey, CachedEntry, StoreId, StoreRegistry};
use crate::sweep::{SweepReport, Sweeper};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

pub struct LifecycleController {
    state: Arc<RwLock<WorkerState>>,
    registry: StoreRegistry,
    fetcher: Arc<dyn Fetch>,
    clients: Clients,
    shell_id: StoreId,
    data_id: StoreId,
    precache: Vec<String>,
    sweeper: Sweeper,
}

impl LifecycleController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: StoreRegistry,
        fetcher: Arc<dyn Fetch>,
        clients: Clients,
        shell_id: StoreId,
        data_id: StoreId,
        precache: Vec<String>,
        sweeper: Sweeper,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(WorkerState::Uninstalled)),
            registry,
            fetcher,
            clients,
            shell_id,
            data_id,
            precache,
            sweeper,
        }
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    async fn transition(&self, from: &[WorkerState], to: WorkerState) -> Result<()> {
        let mut state = self.state.write().await;
        if !from.contains(&*state) {
            return Err(WorkerError::InvalidTransition {
                from: state.as_str(),
                to: to.as_str(),
            });
        }
        info!(from = state.as_str(), to = to.as_str(), "lifecycle transition");
        *state = to;
        Ok(())
    }

    /// Install transition: provision the app-shell store with the precache
    /// manifest. Any single asset failing fails the whole install; the
    /// worker drops back to `Uninstalled` for the host to retry. On success
    /// the new version is immediately ready to supersede the old one.
    pub async fn install(&self) -> Result<()> {
        self.transition(&[WorkerState::Uninstalled], WorkerState::Installing)
            .await?;

        let shell = self.registry.open(&self.shell_id).await;

        // Assets fetch and store in parallel, like the bulk add they model.
        let writes = self.precache.iter().map(|url| {
            let shell = shell.clone();
            async move {
                let response = self.fetcher.fetch(&Request::get(url)).await.map_err(|e| {
                    WorkerError::Precache {
                        url: url.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if response.status != 200 {
                    return Err(WorkerError::Precache {
                        url: url.clone(),
                        reason: format!("HTTP {}", response.status),
                    });
                }
                shell
                    .put(CachedEntry::from_response(CacheKey::get(url), &response))
                    .await;
                Ok::<(), WorkerError>(())
            }
        });

        let failures: Vec<WorkerError> = join_all(writes)
            .await
            .into_iter()
            .filter_map(|r| r.err())
            .collect();

        if let Some(failure) = failures.into_iter().next() {
            error!(error = %failure, "install failed, surfacing to host for retry");
            *self.state.write().await = WorkerState::Uninstalled;
            return Err(failure);
        }

        info!(store = %self.shell_id, assets = self.precache.len(), "app shell precached");
        self.transition(&[WorkerState::Installing], WorkerState::Waiting)
            .await
    }

    /// Activate transition: delete superseded stores, sweep the data store,
    /// claim every open client. Cleanup and sweep failures are logged and
    /// non-fatal; activation always completes once started.
    pub async fn activate(&self) -> Result<()> {
        self.transition(&[WorkerState::Waiting], WorkerState::Activating)
            .await?;

        self.cleanup_stale_stores().await;

        let data = self.registry.open(&self.data_id).await;
        let report = self.sweeper.sweep(&data).await;
        self.log_sweep(report);

        let claimed = self.clients.claim(&self.shell_id.qualified()).await;
        info!(claimed, "took control of open clients");

        self.transition(&[WorkerState::Activating], WorkerState::Active)
            .await
    }

    /// Immediate promotion without waiting for clients to release the
    /// prior version.
    pub async fn skip_waiting(&self) -> Result<()> {
        match self.state().await {
            WorkerState::Waiting => self.activate().await,
            // Nothing is waiting; the message is a no-op.
            _ => Ok(()),
        }
    }

    async fn cleanup_stale_stores(&self) {
        let live = [self.shell_id.qualified(), self.data_id.qualified()];
        let stale: Vec<String> = self
            .registry
            .names()
            .await
            .into_iter()
            .filter(|name| !live.contains(name))
            .collect();

        let deletions = stale.iter().map(|name| {
            let registry = self.registry.clone();
            async move {
                if registry.delete(name).await {
                    info!(store = %name, "removed superseded store");
                } else {
                    warn!(store = %name, "superseded store vanished before cleanup");
                }
            }
        });
        join_all(deletions).await;
    }

    fn log_sweep(&self, report: SweepReport) {
        if report.evicted > 0 {
            info!(
                store = %self.data_id,
                scanned = report.scanned,
                evicted = report.evicted,
                "activation sweep evicted entries"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::ScriptedFetcher;
    use crate::models::{Response, StoredType};
    use bytes::Bytes;
    use std::collections::HashMap;

    struct Harness {
        lifecycle: LifecycleController,
        fetcher: Arc<ScriptedFetcher>,
        registry: StoreRegistry,
        clients: Clients,
    }

    fn harness(precache: &[&str]) -> Harness {
        let registry = StoreRegistry::new();
        let fetcher = Arc::new(ScriptedFetcher::new());
        let clients = Clients::new();
        let lifecycle = LifecycleController::new(
            registry.clone(),
            fetcher.clone(),
            clients.clone(),
            StoreId::new("app-shell", "v2"),
            StoreId::new("app-data", "v2"),
            precache.iter().map(|s| s.to_string()).collect(),
            Sweeper::new(100),
        );
        Harness {
            lifecycle,
            fetcher,
            registry,
            clients,
        }
    }

    #[tokio::test]
    async fn test_install_precaches_and_waits() {
        let h = harness(&["/", "/index.html"]);
        h.fetcher.route_ok("/", b"root");
        h.fetcher.route_ok("/index.html", b"<html>");

        h.lifecycle.install().await.unwrap();
        assert_eq!(h.lifecycle.state().await, WorkerState::Waiting);

        let shell = h.registry.open(&StoreId::new("app-shell", "v2")).await;
        assert_eq!(shell.len().await, 2);
    }

    #[tokio::test]
    async fn test_install_fails_when_any_asset_fails() {
        let h = harness(&["/", "/index.html"]);
        h.fetcher.route_ok("/", b"root");
        // /index.html unrouted: its fetch fails

        let err = h.lifecycle.install().await.unwrap_err();
        assert!(matches!(err, WorkerError::Precache { .. }));
        // Back to uninstalled so the host can retry
        assert_eq!(h.lifecycle.state().await, WorkerState::Uninstalled);

        // Retry succeeds once the asset is reachable
        h.fetcher.route_ok("/index.html", b"<html>");
        h.lifecycle.install().await.unwrap();
        assert_eq!(h.lifecycle.state().await, WorkerState::Waiting);
    }

    #[tokio::test]
    async fn test_install_rejects_non_200_asset() {
        let h = harness(&["/broken.css"]);
        h.fetcher.route(
            "/broken.css",
            Response::new(500, StoredType::Basic, HashMap::new(), Bytes::from_static(b"")),
        );

        let err = h.lifecycle.install().await.unwrap_err();
        assert!(format!("{}", err).contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_activation_deletes_exactly_the_stale_stores() {
        let h = harness(&["/"]);
        h.fetcher.route_ok("/", b"root");

        // Superseded and live stores side by side
        h.registry.open(&StoreId::new("app-shell", "v1")).await;
        h.registry.open(&StoreId::new("app-data", "v1")).await;
        h.registry.open(&StoreId::new("app-data", "v2")).await;

        h.lifecycle.install().await.unwrap();
        h.lifecycle.activate().await.unwrap();

        assert!(!h.registry.contains("app-shell-v1").await);
        assert!(!h.registry.contains("app-data-v1").await);
        assert!(h.registry.contains("app-shell-v2").await);
        assert!(h.registry.contains("app-data-v2").await);
        assert_eq!(h.lifecycle.state().await, WorkerState::Active);
    }

    #[tokio::test]
    async fn test_activation_claims_clients() {
        let h = harness(&["/"]);
        h.fetcher.route_ok("/", b"root");
        h.clients.connect("/").await;
        h.clients.connect("/parts").await;

        h.lifecycle.install().await.unwrap();
        h.lifecycle.activate().await.unwrap();

        assert_eq!(h.clients.controlled_by("app-shell-v2").await, 2);
    }

    #[tokio::test]
    async fn test_transition_guards() {
        let h = harness(&["/"]);
        h.fetcher.route_ok("/", b"root");

        // Activate before install is rejected
        assert!(matches!(
            h.lifecycle.activate().await.unwrap_err(),
            WorkerError::InvalidTransition { .. }
        ));

        h.lifecycle.install().await.unwrap();
        // Double install is rejected once waiting
        assert!(matches!(
            h.lifecycle.install().await.unwrap_err(),
            WorkerError::InvalidTransition { .. }
        ));
    }

    #[tokio::test]
    async fn test_skip_waiting_promotes_immediately() {
        let h = harness(&["/"]);
        h.fetcher.route_ok("/", b"root");

        // No-op while nothing is waiting
        h.lifecycle.skip_waiting().await.unwrap();
        assert_eq!(h.lifecycle.state().await, WorkerState::Uninstalled);

        h.lifecycle.install().await.unwrap();
        h.lifecycle.skip_waiting().await.unwrap();
        assert_eq!(h.lifecycle.state().await, WorkerState::Active);
    }
}
