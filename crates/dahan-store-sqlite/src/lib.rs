//! SQLite backend for the Dahan score tracker.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod query;
mod record;
mod schema;
mod store;
mod sync;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
