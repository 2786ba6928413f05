//! SQLite backend for the snapshot store.

pub mod factory;
pub mod repository;

pub use factory::SqliteStoreFactory;
pub use repository::SqliteSnapshotStore;
