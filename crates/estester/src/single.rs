//! Test case owning a single index.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::EsClient;
use crate::config::SingleIndexConfig;
use crate::error::EsResult;
use crate::fixture::Fixture;
use crate::indices;
use crate::lifecycle::{IndexLifecycle, settle};
use crate::response::AnalyzeToken;

/// A test case bound to one named index.
///
/// `setup` resets and creates the index with the configured mappings and
/// settings, loads the configured fixtures and waits out the settle delay.
///
/// # Example
///
/// ```rust,no_run
/// use estester::{Fixture, IndexLifecycle, SingleIndexConfig, SingleIndexTestCase, hits_total};
/// use serde_json::json;
///
/// # async fn example() -> estester::EsResult<()> {
/// let case = SingleIndexTestCase::new(SingleIndexConfig {
///     fixtures: vec![
///         Fixture::new("dog", "1", json!({"name": "Nina Fox"})),
///         Fixture::new("dog", "2", json!({"name": "Charles M."})),
///     ],
///     timeout: None,
///     ..Default::default()
/// })?;
/// case.setup().await?;
///
/// let response = case.search(None).await?;
/// assert_eq!(hits_total(&response), Some(2));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SingleIndexTestCase {
    client: EsClient,
    config: SingleIndexConfig,
}

impl SingleIndexTestCase {
    /// Creates a test case; no request is sent until an operation is called.
    pub fn new(config: SingleIndexConfig) -> EsResult<Self> {
        let client = EsClient::new(&config.service)?;
        Ok(Self { client, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SingleIndexConfig {
        &self.config
    }

    /// Returns the HTTP client.
    pub fn client(&self) -> &EsClient {
        &self.client
    }

    /// Returns the name of the owned index.
    pub fn index(&self) -> &str {
        &self.config.index
    }

    /// Overrides the settle delay used after loading fixtures.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.config.timeout = timeout;
    }

    /// Checks whether the owned index exists.
    pub async fn index_exists(&self) -> EsResult<bool> {
        indices::index_exists(&self.client, &self.config.index).await
    }

    /// Creates the index with the configured mappings and settings.
    pub async fn create_index(&self) -> EsResult<()> {
        self.create_index_with(None, None).await
    }

    /// Creates the index; `None` falls back to the configured value.
    pub async fn create_index_with(
        &self,
        mappings: Option<&Value>,
        settings: Option<&Value>,
    ) -> EsResult<()> {
        indices::create_index(
            &self.client,
            &self.config.index,
            mappings.unwrap_or(&self.config.mappings),
            settings.unwrap_or(&self.config.settings),
            self.config.reset_index,
        )
        .await
    }

    /// Deletes the index if it exists.
    pub async fn delete_index(&self) -> EsResult<()> {
        indices::delete_index(&self.client, &self.config.index).await
    }

    /// Loads the configured fixtures, then settles.
    pub async fn load_fixtures(&self) -> EsResult<()> {
        self.load_fixtures_from(&self.config.fixtures).await
    }

    /// Loads the given fixtures, then settles once for the whole batch.
    pub async fn load_fixtures_from(&self, fixtures: &[Fixture]) -> EsResult<()> {
        indices::post_fixtures(&self.client, &self.config.index, fixtures).await?;
        settle(self.config.timeout).await;
        Ok(())
    }

    /// Searches the index; `None` matches every document.
    pub async fn search(&self, query: Option<&Value>) -> EsResult<Value> {
        indices::search(&self.client, Some(self.config.index.as_str()), query).await
    }

    /// Fetches a document by type and id.
    pub async fn get(&self, doc_type: &str, id: &str) -> EsResult<Value> {
        indices::get_document(&self.client, &self.config.index, doc_type, id).await
    }

    /// Refreshes the owned index.
    pub async fn refresh(&self) -> EsResult<Value> {
        self.refresh_index(Some(self.config.index.as_str())).await
    }

    /// Refreshes `index`, or every index for `None`.
    pub async fn refresh_index(&self, index: Option<&str>) -> EsResult<Value> {
        indices::refresh(&self.client, index).await
    }

    /// Runs `text` through `analyzer`.
    pub async fn tokenize(&self, text: &str, analyzer: &str) -> EsResult<Vec<AnalyzeToken>> {
        indices::tokenize(&self.client, text, analyzer).await
    }

    /// Lists the aliases of the owned index.
    pub async fn get_aliases(&self) -> EsResult<BTreeSet<String>> {
        indices::get_aliases(&self.client, &self.config.index).await
    }

    /// Attaches aliases to the owned index.
    pub async fn create_aliases<S: AsRef<str>>(&self, aliases: &[S]) -> EsResult<()> {
        indices::create_aliases(&self.client, &self.config.index, aliases).await
    }

    /// Reads the index mappings as `type -> mapping`.
    pub async fn get_mapping(&self) -> EsResult<Value> {
        indices::get_mapping(&self.client, &self.config.index).await
    }

    /// Reads the index settings in nested form.
    pub async fn get_settings(&self) -> EsResult<Value> {
        indices::get_settings(&self.client, &self.config.index).await
    }
}

#[async_trait]
impl IndexLifecycle for SingleIndexTestCase {
    async fn setup(&self) -> EsResult<()> {
        tracing::debug!(index = %self.config.index, "Setting up single-index test case");
        self.create_index().await?;
        self.load_fixtures().await
    }

    async fn teardown(&self) -> EsResult<()> {
        if self.config.delete_on_teardown {
            self.delete_index().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_config() {
        let case = SingleIndexTestCase::new(SingleIndexConfig::default()).unwrap();
        assert_eq!(case.index(), "sample.test");
        assert_eq!(case.client().base_url().as_str(), "http://0.0.0.0:9200/");
    }

    #[test]
    fn test_set_timeout() {
        let mut case = SingleIndexTestCase::new(SingleIndexConfig::default()).unwrap();
        case.set_timeout(None);
        assert!(case.config().timeout.is_none());
    }

    #[test]
    fn test_invalid_host_fails_construction() {
        let mut config = SingleIndexConfig::default();
        config.service.host = "::nope::".to_string();
        assert!(SingleIndexTestCase::new(config).is_err());
    }
}
