// Store registry module: named, versioned key-value stores for cached
// responses

mod models;
mod registry;

pub use models::{CacheKey, CachedEntry, StoreId};
pub use registry::{StoreHandle, StoreRegistry};
