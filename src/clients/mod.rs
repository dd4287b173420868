// Client session tracking and takeover (claim)

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// An open client session (a page the host application has loaded).
#[derive(Debug, Clone)]
pub struct ClientSession {
    pub id: Uuid,
    pub url: String,
    /// Qualified identity of the worker version controlling this session,
    /// if any. Sessions start uncontrolled until claimed.
    pub controller: Option<String>,
}

/// Registry of currently open client sessions.
#[derive(Clone, Default)]
pub struct Clients {
    sessions: Arc<RwLock<HashMap<Uuid, ClientSession>>>,
}

impl Clients {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly opened session. It remains uncontrolled until the
    /// next activation claims it.
    pub async fn connect(&self, url: &str) -> ClientSession {
        let session = ClientSession {
            id: Uuid::new_v4(),
            url: url.to_string(),
            controller: None,
        };
        self.sessions.write().await.insert(session.id, session.clone());
        debug!(client = %session.id, url, "client connected");
        session
    }

    pub async fn disconnect(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Take control of every open session immediately; none need reload to
    /// be served by the claiming version. Returns how many were claimed.
    pub async fn claim(&self, version: &str) -> usize {
        let mut sessions = self.sessions.write().await;
        for session in sessions.values_mut() {
            session.controller = Some(version.to_string());
        }
        debug!(version, claimed = sessions.len(), "claimed clients");
        sessions.len()
    }

    pub async fn controlled_by(&self, version: &str) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| s.controller.as_deref() == Some(version))
            .count()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_and_claim() {
        let clients = Clients::new();
        let a = clients.connect("/").await;
        clients.connect("/parts").await;

        assert!(a.controller.is_none());
        assert_eq!(clients.controlled_by("app-shell-v2").await, 0);

        let claimed = clients.claim("app-shell-v2").await;
        assert_eq!(claimed, 2);
        assert_eq!(clients.controlled_by("app-shell-v2").await, 2);
    }

    #[tokio::test]
    async fn test_claim_replaces_previous_controller() {
        let clients = Clients::new();
        clients.connect("/").await;
        clients.claim("app-shell-v1").await;

        clients.claim("app-shell-v2").await;
        assert_eq!(clients.controlled_by("app-shell-v1").await, 0);
        assert_eq!(clients.controlled_by("app-shell-v2").await, 1);
    }

    #[tokio::test]
    async fn test_disconnect() {
        let clients = Clients::new();
        let session = clients.connect("/").await;
        assert!(clients.disconnect(session.id).await);
        assert!(!clients.disconnect(session.id).await);
        assert_eq!(clients.len().await, 0);
    }
}
