//! CLI tooling entry point.

pub mod cli;
