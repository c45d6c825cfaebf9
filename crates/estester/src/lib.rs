//! Test-case scaffolding for a running Elasticsearch service.
//!
//! This crate helps integration tests exercise a search service over its
//! REST API: creating and deleting indices, loading fixture documents,
//! searching, tokenizing and managing aliases. The service itself is an
//! external collaborator reached purely over HTTP.
//!
//! # Architecture
//!
//! - [`client`] - thin HTTP wrapper returning decoded JSON or a service error
//! - [`config`] - explicit configuration for both test-case flavors
//! - [`fixture`] - fixture documents and fixture files
//! - [`indices`] - index, document and alias primitives
//! - [`response`] - readers that accept both response dialects
//! - [`lifecycle`] - the ordered setup routine (reset, create, load, settle)
//! - [`single`] / [`multi`] - the single-index and multi-index test cases
//!
//! # Quick Start
//!
//! ```no_run
//! use estester::{Fixture, IndexLifecycle, SingleIndexConfig, SingleIndexTestCase};
//! use serde_json::json;
//!
//! # async fn example() -> estester::EsResult<()> {
//! let case = SingleIndexTestCase::new(SingleIndexConfig {
//!     fixtures: vec![Fixture::new("dog", "1", json!({"name": "Nina Fox"}))],
//!     ..Default::default()
//! })?;
//!
//! // Reset the index, create it, load fixtures and wait for them to settle.
//! case.setup().await?;
//!
//! let doc = case.get("dog", "1").await?;
//! assert_eq!(estester::document_found(&doc), Some(true));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fixture;
pub mod indices;
pub mod lifecycle;
pub mod multi;
pub mod response;
pub mod single;

pub use client::EsClient;
pub use config::{
    DEFAULT_HOST, DEFAULT_INDEX, DEFAULT_SETTLE_TIMEOUT, IndexDefinition, MultiIndexConfig,
    ServiceConfig, SingleIndexConfig, load_data_file,
};
pub use error::{EsError, EsResult};
pub use fixture::{Fixture, load_fixture_file};
pub use lifecycle::{IndexLifecycle, settle};
pub use multi::MultiIndexTestCase;
pub use response::{
    AnalyzeToken, alias_names, document_found, hit_ids, hit_sources, hits_total,
    normalize_mappings, normalize_settings,
};
pub use single::SingleIndexTestCase;
