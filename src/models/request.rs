// Intercepted request model

use serde::{Deserialize, Serialize};

/// What the requesting context intends to do with the response.
///
/// Only the document/non-document distinction matters to the router: a
/// `Document` request with no network and no cached entry falls back to the
/// offline fallback document, anything else propagates absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Document,
    Other,
}

/// An intercepted outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request method, uppercased at construction.
    pub method: String,
    /// Full URL including any query string (query is significant for
    /// cache identity).
    pub url: String,
    /// Requesting context.
    pub destination: Destination,
}

impl Request {
    pub fn new(method: &str, url: &str, destination: Destination) -> Self {
        Self {
            method: method.to_uppercase(),
            url: url.to_string(),
            destination,
        }
    }

    /// A plain GET for a subresource (script, style, image, API call).
    pub fn get(url: &str) -> Self {
        Self::new("GET", url, Destination::Other)
    }

    /// A top-level navigation request.
    pub fn document(url: &str) -> Self {
        Self::new("GET", url, Destination::Document)
    }

    /// Whether this request targets the data API, by URL shape.
    pub fn is_api_request(&self, api_marker: &str) -> bool {
        self.url.contains(api_marker)
    }
}
