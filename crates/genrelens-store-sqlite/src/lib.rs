//! SQLite backend for GenreLens raw records and product metadata.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod source;

pub mod error;

pub use error::{Error, Result};
pub use source::SqliteSource;
