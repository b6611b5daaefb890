//! unidis-core
//!
//! Normalized, disassembler-agnostic view over a host analysis database.
//!
//! This crate defines the host engine port (backends), the normalized object
//! model, and the database facade that maps one onto the other. Downstream
//! tooling queries functions, bytes, segments, references, strings and types
//! through [`db::Database`] without caring which disassembler produced them.
//!
//! All substantive logic lives here so it is testable against an in-memory
//! host and reusable from multiple frontends.

pub mod backends;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;

pub use db::{Database, SegmentKey};
pub use error::{DisasmError, DisasmResult};

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
