//! Input helpers.
//!
//! - measurement-file ingest + validation (`ingest`)

pub mod ingest;

pub use ingest::*;
