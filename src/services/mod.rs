// Service exports
pub mod auth;
pub mod cache;
pub mod geocoder;
pub mod storage;
pub mod store;
pub mod suggest;

pub use auth::{AuthError, Identity, IdentityVerifier};
pub use cache::{CacheError, CacheKey, CollectionCache};
pub use geocoder::{GeocodeError, GeocoderClient};
pub use storage::{StorageClient, StorageError};
pub use store::{StoreClient, StoreCollections, StoreError};
pub use suggest::SuggestScheduler;
