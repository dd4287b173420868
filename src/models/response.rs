// Response model and cacheability rules

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Provenance classification of a fetched response.
///
/// `Basic` is a same-origin, non-redirected response; only these may enter
/// the app-shell store. Cross-origin responses are `Opaque`, everything
/// else (redirects landing off-origin, synthetic responses) is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredType {
    Basic,
    Opaque,
    Other,
}

/// A response produced by the router, either live from the network or
/// replayed from a store.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub kind: StoredType,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
    /// True when replayed from a store rather than fetched live.
    pub from_cache: bool,
}

impl Response {
    pub fn new(status: u16, kind: StoredType, headers: HashMap<String, String>, body: Bytes) -> Self {
        Self {
            status,
            kind,
            headers,
            body,
            from_cache: false,
        }
    }

    /// Eligible for the data store: any 200, regardless of provenance.
    pub fn is_data_cacheable(&self) -> bool {
        self.status == 200
    }

    /// Eligible for the app-shell store: 200 and same-origin non-redirected.
    pub fn is_shell_cacheable(&self) -> bool {
        self.status == 200 && self.kind == StoredType::Basic
    }
}
