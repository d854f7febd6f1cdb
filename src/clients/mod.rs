/// HTTP client for the backend proxy
pub mod api;
/// Data entities for tracks, artists and albums
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Key-value storage using `DuckDB`, plus an in-memory variant
pub mod local_storage;

pub use api::{ApiClient, Backend};
pub use local_storage::{KeyValueStorage, LocalStorage, MemoryStorage};
