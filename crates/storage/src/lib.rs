pub mod error;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use error::StorageError;
pub use sqlite::SqliteStore;
pub use store::{KeyValueStore, MemoryStore};
