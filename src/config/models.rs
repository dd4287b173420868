//! Configuration data structures for the cache worker.
//!
//! This module defines the schema for worker settings: the two store
//! identities, the precache manifest, routing knobs and the network client
//! parameters. The host application constructs (or deserializes) one
//! `WorkerConfig` and hands it to the worker; there is no file or
//! environment loading — the worker is an embedded component.

use serde::{Deserialize, Serialize};

/// The root configuration object for the cache worker.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkerConfig {
    /// Identity of the app-shell store (static assets).
    #[serde(default)]
    pub shell: ShellStoreConfig,

    /// Identity and capacity of the data store (API responses).
    #[serde(default)]
    pub data: DataStoreConfig,

    /// Routing knobs: API marker, offline fallback document.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Network client settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Identity of the app-shell store plus the assets installed into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellStoreConfig {
    /// Store family name. Default: `app-shell`
    #[serde(default = "default_shell_name")]
    pub name: String,

    /// Store version; bumping it supersedes the previous store wholesale.
    /// Default: `v1`
    #[serde(default = "default_version")]
    pub version: String,

    /// URLs bulk-written at install time, all-or-nothing.
    /// Default: `["/", "/index.html"]`
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,
}

/// Identity of the data store and its eviction capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataStoreConfig {
    /// Store family name. Default: `app-data`
    #[serde(default = "default_data_name")]
    pub name: String,

    /// Store version. Default: `v1`
    #[serde(default = "default_version")]
    pub version: String,

    /// Maximum entry count enforced by the activation sweep.
    /// Default: `100`
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

/// Request classification and fallback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Substring marking a URL as an API request.
    /// Default: `/api/`
    #[serde(default = "default_api_marker")]
    pub api_marker: String,

    /// Key of the stored document served when a document request fails with
    /// no network and no cached entry. Default: `/index.html`
    #[serde(default = "default_fallback")]
    pub offline_fallback: String,
}

/// Settings for the outbound HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Origin that path-only request URLs are resolved against.
    /// Default: `http://127.0.0.1:8080`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. Default: `30`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default trait implementations linking to custom logic

impl Default for ShellStoreConfig {
    fn default() -> Self {
        Self {
            name: default_shell_name(),
            version: default_version(),
            precache: default_precache(),
        }
    }
}

impl Default for DataStoreConfig {
    fn default() -> Self {
        Self {
            name: default_data_name(),
            version: default_version(),
            capacity: default_capacity(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            api_marker: default_api_marker(),
            offline_fallback: default_fallback(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults and shared constants

fn default_shell_name() -> String {
    "app-shell".to_string()
}

fn default_data_name() -> String {
    "app-data".to_string()
}

fn default_version() -> String {
    "v1".to_string()
}

fn default_precache() -> Vec<String> {
    vec!["/".to_string(), "/index.html".to_string()]
}

fn default_capacity() -> usize {
    100
}

fn default_api_marker() -> String {
    "/api/".to_string()
}

fn default_fallback() -> String {
    "/index.html".to_string()
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
