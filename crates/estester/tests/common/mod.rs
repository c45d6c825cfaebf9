//! Shared test infrastructure.
//!
//! Wire-level tests run against a `wiremock` server standing in for the
//! search service; fixture sets mirror the documents used across the suite.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
