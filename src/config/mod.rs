// Configuration module

mod models;

pub use models::*;

use crate::error::Result;

impl WorkerConfig {
    /// Build a configuration from a JSON document supplied by the host.
    ///
    /// Missing fields fall back to their documented defaults; there is no
    /// file or environment lookup.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
