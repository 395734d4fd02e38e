pub mod sqlite_store;
pub mod store;

pub use sqlite_store::SqliteFileStore;
pub use store::FileStore;
