// offshell - offline-first app-shell cache worker

pub mod clients;
pub mod config;
pub mod error;
pub mod fetch;
pub mod lifecycle;
pub mod models;
pub mod router;
pub mod runtime;
pub mod store;
pub mod sweep;
pub mod utils;
pub mod worker;
