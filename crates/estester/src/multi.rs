//! Test case spanning several named indices.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::EsClient;
use crate::config::MultiIndexConfig;
use crate::error::EsResult;
use crate::fixture::Fixture;
use crate::indices;
use crate::lifecycle::{IndexLifecycle, settle};
use crate::response::AnalyzeToken;

/// A test case over a set of declared indices, each with its own settings,
/// mappings, fixtures and aliases.
///
/// Every primitive takes the index name explicitly. Searching without a
/// target covers all declared indices; searching an alias lets the service
/// fan the query out to every index carrying it.
#[derive(Debug, Clone)]
pub struct MultiIndexTestCase {
    client: EsClient,
    config: MultiIndexConfig,
}

impl MultiIndexTestCase {
    /// Creates a test case; no request is sent until an operation is called.
    pub fn new(config: MultiIndexConfig) -> EsResult<Self> {
        let client = EsClient::new(&config.service)?;
        Ok(Self { client, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MultiIndexConfig {
        &self.config
    }

    /// Returns the HTTP client.
    pub fn client(&self) -> &EsClient {
        &self.client
    }

    /// Returns the declared index names in order.
    pub fn index_names(&self) -> Vec<&str> {
        self.config.data.keys().map(String::as_str).collect()
    }

    /// Overrides the settle delay used after loading fixtures.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.config.timeout = timeout;
    }

    /// Checks whether `index` exists.
    pub async fn index_exists(&self, index: &str) -> EsResult<bool> {
        indices::index_exists(&self.client, index).await
    }

    /// Creates `index` with the default mappings and settings.
    pub async fn create_index(&self, index: &str) -> EsResult<()> {
        self.create_index_with(index, None, None).await
    }

    /// Creates `index`; `None` falls back to the default value.
    pub async fn create_index_with(
        &self,
        index: &str,
        mappings: Option<&Value>,
        settings: Option<&Value>,
    ) -> EsResult<()> {
        indices::create_index(
            &self.client,
            index,
            mappings.unwrap_or(&self.config.mappings),
            settings.unwrap_or(&self.config.settings),
            self.config.reset_index,
        )
        .await
    }

    /// Deletes `index` if it exists.
    pub async fn delete_index(&self, index: &str) -> EsResult<()> {
        indices::delete_index(&self.client, index).await
    }

    /// Loads fixtures into `index`, then settles once.
    pub async fn load_fixtures(&self, index: &str, fixtures: &[Fixture]) -> EsResult<()> {
        indices::post_fixtures(&self.client, index, fixtures).await?;
        settle(self.config.timeout).await;
        Ok(())
    }

    /// Searches across every declared index and returns the merged hits.
    ///
    /// Declared indices deleted by the test are skipped.
    pub async fn search(&self, query: Option<&Value>) -> EsResult<Value> {
        indices::search_many(&self.client, &self.index_names(), query).await
    }

    /// Searches one index or alias.
    pub async fn search_in_index(&self, index: &str, query: Option<&Value>) -> EsResult<Value> {
        indices::search(&self.client, Some(index), query).await
    }

    /// Fetches a document from `index` by type and id.
    pub async fn get(&self, index: &str, doc_type: &str, id: &str) -> EsResult<Value> {
        indices::get_document(&self.client, index, doc_type, id).await
    }

    /// Refreshes `index`, or every index for `None`.
    pub async fn refresh_index(&self, index: Option<&str>) -> EsResult<Value> {
        indices::refresh(&self.client, index).await
    }

    /// Runs `text` through `analyzer`.
    pub async fn tokenize(&self, text: &str, analyzer: &str) -> EsResult<Vec<AnalyzeToken>> {
        indices::tokenize(&self.client, text, analyzer).await
    }

    /// Lists the aliases of `index`; empty when the index does not exist.
    pub async fn get_aliases(&self, index: &str) -> EsResult<BTreeSet<String>> {
        indices::get_aliases(&self.client, index).await
    }

    /// Attaches aliases to `index`.
    pub async fn create_aliases<S: AsRef<str>>(&self, index: &str, aliases: &[S]) -> EsResult<()> {
        indices::create_aliases(&self.client, index, aliases).await
    }

    /// Reads the mappings of `index` as `type -> mapping`.
    pub async fn get_mapping(&self, index: &str) -> EsResult<Value> {
        indices::get_mapping(&self.client, index).await
    }

    /// Reads the settings of `index` in nested form.
    pub async fn get_settings(&self, index: &str) -> EsResult<Value> {
        indices::get_settings(&self.client, index).await
    }
}

#[async_trait]
impl IndexLifecycle for MultiIndexTestCase {
    async fn setup(&self) -> EsResult<()> {
        for (name, definition) in &self.config.data {
            tracing::debug!(index = %name, "Setting up index");
            self.create_index_with(
                name,
                definition.mappings.as_ref(),
                definition.settings.as_ref(),
            )
            .await?;
            self.create_aliases(name, definition.aliases.as_slice()).await?;
            indices::post_fixtures(&self.client, name, &definition.fixtures).await?;
        }
        settle(self.config.timeout).await;
        Ok(())
    }

    async fn teardown(&self) -> EsResult<()> {
        if self.config.delete_on_teardown {
            for name in self.config.data.keys() {
                self.delete_index(name).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexDefinition;

    #[test]
    fn test_index_names_are_ordered() {
        let mut config = MultiIndexConfig::default();
        config
            .data
            .insert("professional".to_string(), IndexDefinition::default());
        config
            .data
            .insert("magical".to_string(), IndexDefinition::default());
        config
            .data
            .insert("personal".to_string(), IndexDefinition::default());

        let case = MultiIndexTestCase::new(config).unwrap();
        assert_eq!(case.index_names(), vec!["magical", "personal", "professional"]);
    }
}
