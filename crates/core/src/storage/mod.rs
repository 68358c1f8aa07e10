pub mod manager;
pub mod persist;

pub use manager::SessionStore;
pub use persist::{FilePersistStore, MemoryPersistStore, PersistStore};
