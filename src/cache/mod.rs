// Cache module for local filesystem caching.
// Stores raw PokéAPI responses so warm runs skip the network.

pub mod paths;
pub mod store;

pub use paths::{CacheKey, CacheLayout, default_cache_dir};
pub use store::{CacheStore, Snapshot, write_atomic};
