// Cache module for memoizing GitHub API responses.
// Provides key derivation plus in-memory and filesystem stores with TTL expiry.

pub mod key;
pub mod paths;
pub mod store;

pub use key::CacheKey;
pub use store::{CacheStore, CachedData, DEFAULT_TTL, DiskStore, MemoryStore};
