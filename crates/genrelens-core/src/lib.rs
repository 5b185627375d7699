//! Core types and computations for GenreLens genre-level market metrics.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! turns time-windowed raw per-product records into genre summary tables;
//! where those records come from is abstracted behind
//! [`source::RecordSource`].

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod metric;
pub mod record;
pub mod source;
pub mod stats;
pub mod window;

pub use engine::MetricsEngine;
pub use error::{Error, Result};
