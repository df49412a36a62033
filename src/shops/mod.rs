// Shop data module.
// Record types, payload decoding, the live HTTP source and the cached repository.

pub mod client;
pub mod decode;
pub mod repository;
pub mod types;

pub use client::RemoteShopSource;
pub use repository::{CachedShopRepository, FixedShopRepository, ShopRepository};
pub use types::{GeoPoint, ShopRecord};
