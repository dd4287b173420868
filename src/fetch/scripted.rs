// Deterministic fetcher serving programmed responses

use super::Fetch;
use crate::error::{Result, WorkerError};
use crate::models::{Request, Response, StoredType};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory fetcher for embedding and tests.
///
/// Serves responses programmed per URL and counts how often each URL is
/// requested; unprogrammed URLs and the offline state both surface as
/// transport failures, which is how the router sees a dead network.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: Mutex<HashMap<String, Response>>,
    hits: Mutex<HashMap<String, usize>>,
    offline: AtomicBool,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program a response for a URL.
    pub fn route(&self, url: &str, response: Response) {
        self.routes.lock().unwrap().insert(url.to_string(), response);
    }

    /// Program a plain 200 `Basic` response with the given body.
    pub fn route_ok(&self, url: &str, body: &'static [u8]) {
        self.route(
            url,
            Response::new(200, StoredType::Basic, HashMap::new(), Bytes::from_static(body)),
        );
    }

    /// Drop a programmed route, making future fetches of it fail.
    pub fn unroute(&self, url: &str) {
        self.routes.lock().unwrap().remove(url);
    }

    /// Simulate losing or regaining the network.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// How many fetches reached the network for this URL.
    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Fetch for ScriptedFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(WorkerError::Network("offline".to_string()));
        }

        *self
            .hits
            .lock()
            .unwrap()
            .entry(request.url.clone())
            .or_insert(0) += 1;

        self.routes
            .lock()
            .unwrap()
            .get(&request.url)
            .cloned()
            .ok_or_else(|| WorkerError::Network(format!("no route for {}", request.url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_routes_and_hit_counting() {
        let fetcher = ScriptedFetcher::new();
        fetcher.route_ok("/app.js", b"console.log(1)");

        let response = fetcher.fetch(&Request::get("/app.js")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(fetcher.hits("/app.js"), 1);

        fetcher.fetch(&Request::get("/app.js")).await.unwrap();
        assert_eq!(fetcher.hits("/app.js"), 2);
    }

    #[tokio::test]
    async fn test_offline_and_unrouted() {
        let fetcher = ScriptedFetcher::new();
        fetcher.route_ok("/app.js", b"x");

        assert!(fetcher.fetch(&Request::get("/nope.js")).await.is_err());

        fetcher.set_offline(true);
        let err = fetcher.fetch(&Request::get("/app.js")).await.unwrap_err();
        assert!(err.is_fetch_failure());
        // Offline fetches never count as network hits
        assert_eq!(fetcher.hits("/app.js"), 0);
    }
}
