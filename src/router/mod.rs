//! Request router: classification and strategy chains.
//!
//! Every intercepted request is classified by URL shape and handed to one
//! of two fixed policies:
//!
//! - **Cache-first** (app shell): stored entry wins outright, the network
//!   is only consulted on a miss, and a dead network degrades to the
//!   offline fallback document for navigations.
//! - **Network-first** (data API): the live response wins and refreshes the
//!   store, a dead network degrades to the last stored response.
//!
//! Each policy is an ordered chain of sources; the router walks the chain
//! and returns the first source that produces a response. A source that
//! yields `None` (cache miss, transport failure, fallback not applicable)
//! simply passes control to the next one. `route` returning `Ok(None)`
//! means the whole chain declined and the caller sees absence.

use crate::config::RoutingConfig;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::models::{Destination, Request, Response};
use crate::store::{CacheKey, CachedEntry, StoreHandle, StoreId, StoreRegistry};
use std::sync::Arc;
use tracing::debug;

/// Which policy applies to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    AppShell,
    Api,
}

/// One source in a strategy chain.
#[derive(Debug, Clone, Copy)]
enum Source {
    /// App-shell store lookup.
    ShellLookup,
    /// Live fetch; duplicates cacheable responses into the app-shell store.
    ShellFetch,
    /// Stored offline fallback document, navigations only.
    DocumentFallback,
    /// Live fetch; duplicates 200s into the data store.
    DataFetch,
    /// Data store lookup by full URL key.
    DataLookup,
}

const CACHE_FIRST: &[Source] = &[Source::ShellLookup, Source::ShellFetch, Source::DocumentFallback];
const NETWORK_FIRST: &[Source] = &[Source::DataFetch, Source::DataLookup];

pub struct RequestRouter {
    registry: StoreRegistry,
    fetcher: Arc<dyn Fetch>,
    shell_id: StoreId,
    data_id: StoreId,
    routing: RoutingConfig,
}

impl RequestRouter {
    pub fn new(
        registry: StoreRegistry,
        fetcher: Arc<dyn Fetch>,
        shell_id: StoreId,
        data_id: StoreId,
        routing: RoutingConfig,
    ) -> Self {
        Self {
            registry,
            fetcher,
            shell_id,
            data_id,
            routing,
        }
    }

    pub fn classify(&self, request: &Request) -> Classification {
        if request.is_api_request(&self.routing.api_marker) {
            Classification::Api
        } else {
            Classification::AppShell
        }
    }

    /// Produce a response for an intercepted request, or `None` when every
    /// source in the applicable chain declined.
    pub async fn route(&self, request: &Request) -> Result<Option<Response>> {
        let chain = match self.classify(request) {
            Classification::AppShell => CACHE_FIRST,
            Classification::Api => NETWORK_FIRST,
        };

        for source in chain {
            if let Some(response) = self.try_source(*source, request).await? {
                return Ok(Some(response));
            }
        }

        debug!(url = %request.url, "no source produced a response");
        Ok(None)
    }

    async fn try_source(&self, source: Source, request: &Request) -> Result<Option<Response>> {
        match source {
            Source::ShellLookup => {
                let shell = self.registry.open(&self.shell_id).await;
                Ok(self.lookup(&shell, request).await)
            }
            Source::ShellFetch => match self.fetcher.fetch(request).await {
                Ok(response) => {
                    if response.is_shell_cacheable() {
                        let shell = self.registry.open(&self.shell_id).await;
                        self.write_through(&shell, request, &response).await;
                    }
                    Ok(Some(response))
                }
                Err(e) => {
                    debug!(url = %request.url, error = %e, "shell fetch failed");
                    Ok(None)
                }
            },
            Source::DocumentFallback => {
                if request.destination != Destination::Document {
                    return Ok(None);
                }
                let shell = self.registry.open(&self.shell_id).await;
                let fallback = CacheKey::get(&self.routing.offline_fallback);
                Ok(shell.lookup(&fallback).await.map(|entry| entry.to_response()))
            }
            Source::DataFetch => match self.fetcher.fetch(request).await {
                Ok(response) => {
                    if response.is_data_cacheable() {
                        let data = self.registry.open(&self.data_id).await;
                        self.write_through(&data, request, &response).await;
                    }
                    Ok(Some(response))
                }
                Err(e) => {
                    debug!(url = %request.url, error = %e, "data fetch failed");
                    Ok(None)
                }
            },
            Source::DataLookup => {
                let data = self.registry.open(&self.data_id).await;
                Ok(self.lookup(&data, request).await)
            }
        }
    }

    async fn lookup(&self, store: &StoreHandle, request: &Request) -> Option<Response> {
        let key = CacheKey::new(&request.method, &request.url);
        let hit = store.lookup(&key).await.map(|entry| entry.to_response());
        if hit.is_some() {
            debug!(store = store.name(), url = %request.url, "cache hit");
        }
        hit
    }

    /// Duplicate a response into a store. The entry is built from an
    /// independent copy of the body, so the caller's response is returned
    /// untouched; a write failure is logged and never propagated.
    async fn write_through(&self, store: &StoreHandle, request: &Request, response: &Response) {
        let key = CacheKey::new(&request.method, &request.url);
        let entry = CachedEntry::from_response(key, response);
        store.put(entry).await;
        debug!(store = store.name(), url = %request.url, "cached response");
    }
}
