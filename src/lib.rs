//! Specsync: API Documentation Collection Synchronization
//!
//! Keeps a hosted API-documentation collection in sync with a
//! machine-generated description of an API's endpoints, while respecting
//! manual edits previously made to that hosted collection.

pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod remote;
pub mod spec;
pub mod sync;
pub mod tooling;
pub mod tree;
