pub mod factory;
pub mod memory;
pub mod repository;

pub use factory::{StoreConfig, StoreFactory, StoreRegistry};
pub use memory::{InMemoryStore, InMemoryStoreFactory};
pub use repository::{
    EMPLOYEES_KEY, PAYMENT_STATE_KEY, SnapshotStore, StoreError, load_payment_snapshot,
    load_roster, save_payment_snapshot, save_roster,
};
