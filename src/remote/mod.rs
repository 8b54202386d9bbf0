//! Hosted collection store boundary.
//!
//! The merge engine never talks to the network; this module owns the
//! contract seam ([`contract`]), the JSON mapping between the hosted
//! collection format and the internal tree ([`collection`]), and the
//! Postman API client implementation ([`postman`]).

pub mod collection;
pub mod contract;
pub mod postman;

pub use contract::{CollectionStore, CollectionSummary, WorkspaceResolver};
pub use postman::{PostmanClient, DEFAULT_BASE_URL};
