//! Index, document and alias operations against the search service.
//!
//! These are the primitives both test-case flavors are built from. Each one is
//! a single request (or a HEAD probe followed by one request) and surfaces
//! service failures unchanged.

use std::collections::BTreeSet;

use reqwest::StatusCode;
use serde_json::{Value, json};

use crate::client::EsClient;
use crate::error::{EsError, EsResult};
use crate::fixture::Fixture;
use crate::response::{self, AnalyzeToken};

/// Query used when a search is issued without one.
pub fn match_all() -> Value {
    json!({ "query": { "match_all": {} } })
}

/// Checks whether an index (or alias) exists.
pub async fn index_exists(client: &EsClient, index: &str) -> EsResult<bool> {
    let status = client.head(&[index]).await?;
    if status.is_success() {
        Ok(true)
    } else if status == StatusCode::NOT_FOUND {
        Ok(false)
    } else {
        Err(EsError::service(
            status,
            format!("unexpected status {} probing index {}", status, index),
        ))
    }
}

/// Creates an index with the given mappings and settings.
///
/// With `reset` set, an existing index of the same name is deleted first and
/// recreated. Without it, an existing index is left as it is.
pub async fn create_index(
    client: &EsClient,
    index: &str,
    mappings: &Value,
    settings: &Value,
    reset: bool,
) -> EsResult<()> {
    if reset {
        delete_index(client, index).await?;
    } else if index_exists(client, index).await? {
        tracing::debug!("Index '{}' already exists, keeping it", index);
        return Ok(());
    }

    let body = json!({
        "mappings": mappings,
        "settings": settings,
    });
    client.put(&[index], &body).await?;

    tracing::info!("Created index '{}'", index);
    Ok(())
}

/// Deletes an index; an absent index is not an error.
pub async fn delete_index(client: &EsClient, index: &str) -> EsResult<()> {
    if client.head(&[index]).await? == StatusCode::NOT_FOUND {
        tracing::debug!("Index '{}' does not exist, nothing to delete", index);
        return Ok(());
    }

    client.delete(&[index]).await?;
    tracing::info!("Deleted index '{}'", index);
    Ok(())
}

/// Writes every fixture into `index`, one request per document.
pub async fn post_fixtures(client: &EsClient, index: &str, fixtures: &[Fixture]) -> EsResult<()> {
    for fixture in fixtures {
        client
            .put(
                &[index, fixture.doc_type.as_str(), fixture.id.as_str()],
                &fixture.body,
            )
            .await?;
    }
    tracing::info!(index = %index, count = fixtures.len(), "Loaded fixtures");
    Ok(())
}

/// Searches `target` (an index, alias or comma-separated list), or every
/// index when `target` is `None`.
pub async fn search(
    client: &EsClient,
    target: Option<&str>,
    query: Option<&Value>,
) -> EsResult<Value> {
    let query = query.cloned().unwrap_or_else(match_all);
    match target {
        Some(target) => client.post(&[target, "_search"], &query).await,
        None => client.post(&["_search"], &query).await,
    }
}

/// Searches several indices in one request.
///
/// Indices that no longer exist are skipped by the service instead of failing
/// the whole search. An empty list searches every index.
pub async fn search_many(
    client: &EsClient,
    indices: &[&str],
    query: Option<&Value>,
) -> EsResult<Value> {
    if indices.is_empty() {
        return search(client, None, query).await;
    }
    let query = query.cloned().unwrap_or_else(match_all);
    let targets = indices.join(",");
    client
        .post_with_query(
            &[targets.as_str(), "_search"],
            &[("ignore_unavailable", "true")],
            &query,
        )
        .await
}

/// Fetches one document; a missing document is a service error carrying the
/// service's not-found payload.
pub async fn get_document(
    client: &EsClient,
    index: &str,
    doc_type: &str,
    id: &str,
) -> EsResult<Value> {
    client.get(&[index, doc_type, id]).await
}

/// Makes recent writes searchable in `index`, or in every index for `None`.
pub async fn refresh(client: &EsClient, index: Option<&str>) -> EsResult<Value> {
    match index {
        Some(index) => client.post_empty(&[index, "_refresh"]).await,
        None => client.post_empty(&["_refresh"]).await,
    }
}

/// Runs `text` through `analyzer` and returns the resulting tokens.
pub async fn tokenize(
    client: &EsClient,
    text: &str,
    analyzer: &str,
) -> EsResult<Vec<AnalyzeToken>> {
    let response = client
        .get_with_query(&["_analyze"], &[("analyzer", analyzer), ("text", text)])
        .await?;
    response::parse_tokens(&response)
}

/// Lists the aliases of `index`.
///
/// A missing index yields the empty set; any other failure is returned.
pub async fn get_aliases(client: &EsClient, index: &str) -> EsResult<BTreeSet<String>> {
    match client.get(&[index, "_aliases"]).await {
        Ok(response) => Ok(response::alias_names(&response)),
        Err(e) if e.is_not_found() => Ok(BTreeSet::new()),
        Err(e) => Err(e),
    }
}

/// Attaches each alias in `aliases` to `index`.
pub async fn create_aliases<S: AsRef<str>>(
    client: &EsClient,
    index: &str,
    aliases: &[S],
) -> EsResult<()> {
    if aliases.is_empty() {
        return Ok(());
    }

    let actions: Vec<Value> = aliases
        .iter()
        .map(|alias| json!({ "add": { "index": index, "alias": alias.as_ref() } }))
        .collect();
    client.post(&["_aliases"], &json!({ "actions": actions })).await?;

    tracing::info!(index = %index, count = aliases.len(), "Created aliases");
    Ok(())
}

/// Reads the mappings of `index` as a `type -> mapping` object.
pub async fn get_mapping(client: &EsClient, index: &str) -> EsResult<Value> {
    let response = client.get(&[index, "_mapping"]).await?;
    Ok(response::normalize_mappings(index, &response))
}

/// Reads the settings of `index` in nested form.
pub async fn get_settings(client: &EsClient, index: &str) -> EsResult<Value> {
    let response = client.get(&[index, "_settings"]).await?;
    Ok(response::normalize_settings(index, &response))
}
