// Cache module for local filesystem caching.
// Keeps an offline snapshot of the shop list.

pub mod paths;
pub mod store;

pub use store::CacheStore;
