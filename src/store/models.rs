//! Store identity, cache keys and cached entries.
//!
//! A store is identified by `(name, version)`; its qualified form
//! (`"app-shell-v2"`) is what activation compares against when sweeping
//! out superseded stores. Entries are immutable snapshots of a response,
//! replaced wholesale on re-store, never mutated in place.

use crate::models::{Response, StoredType};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identity of a store: family name plus version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreId {
    pub name: String,
    pub version: String,
}

impl StoreId {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    /// The on-storage name, e.g. `app-shell-v2`.
    pub fn qualified(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// Normalized request identity: method plus full URL, query significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub method: String,
    pub url: String,
}

impl CacheKey {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_uppercase(),
            url: url.to_string(),
        }
    }

    /// Key for a GET of the given URL, the common case.
    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }
}

/// An immutable cached response.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub key: CacheKey,
    pub status: u16,
    pub kind: StoredType,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
    pub stored_at: DateTime<Utc>,
}

impl CachedEntry {
    /// Snapshot a response for storage. The body is an independent copy;
    /// the caller's response is not consumed or altered.
    pub fn from_response(key: CacheKey, response: &Response) -> Self {
        Self {
            key,
            status: response.status,
            kind: response.kind,
            headers: response.headers.clone(),
            body: response.body.clone(),
            stored_at: Utc::now(),
        }
    }

    /// Replay this entry as a response.
    pub fn to_response(&self) -> Response {
        Response {
            status: self.status,
            kind: self.kind,
            headers: self.headers.clone(),
            body: self.body.clone(),
            from_cache: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_id() {
        let id = StoreId::new("app-shell", "v2");
        assert_eq!(id.qualified(), "app-shell-v2");
        assert_eq!(id.to_string(), "app-shell-v2");
    }

    #[test]
    fn test_key_normalization_and_query() {
        assert_eq!(CacheKey::new("get", "/a"), CacheKey::get("/a"));
        // Query string is part of the identity
        assert_ne!(CacheKey::get("/api/parts?page=1"), CacheKey::get("/api/parts?page=2"));
    }

    #[test]
    fn test_entry_round_trip_marks_cache_hit() {
        let live = Response::new(
            200,
            StoredType::Basic,
            HashMap::from([("content-type".to_string(), "text/html".to_string())]),
            Bytes::from_static(b"<html>"),
        );
        let entry = CachedEntry::from_response(CacheKey::get("/index.html"), &live);
        let replayed = entry.to_response();

        assert!(!live.from_cache);
        assert!(replayed.from_cache);
        assert_eq!(replayed.status, 200);
        assert_eq!(replayed.body, live.body);
    }
}
