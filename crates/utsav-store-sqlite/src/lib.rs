//! SQLite backend for the Utsav marketplace.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each call runs as one closure on that
//! thread, so cart merges are single-statement upserts inside a transaction
//! rather than read-modify-write round trips.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
