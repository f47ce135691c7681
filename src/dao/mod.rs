/// Database model definitions.
pub mod models;
/// Record storage backends (in-memory and MongoDB).
pub mod record_store;
/// Storage abstraction layer for database operations.
pub mod storage;
