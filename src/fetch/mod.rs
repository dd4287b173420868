//! Network seam for the worker.
//!
//! All live traffic goes through the [`Fetch`] trait so the router and
//! lifecycle controller never talk to the network directly. Production use
//! wires in [`HttpFetcher`]; embedding and tests can use
//! [`ScriptedFetcher`], which serves programmed responses and counts hits.
//!
//! A `fetch` returns `Ok(Response)` for anything the server answered,
//! whatever the status; `Err` means the transport itself failed (offline,
//! refused, timed out).

mod http;
mod scripted;

pub use http::HttpFetcher;
pub use scripted::ScriptedFetcher;

use crate::error::Result;
use crate::models::{Request, Response};
use async_trait::async_trait;

/// Abstraction over the live network.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response>;
}
