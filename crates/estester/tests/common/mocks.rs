//! Mock search service helpers.

#![allow(dead_code)]

use std::collections::BTreeMap;

use estester::{IndexDefinition, MultiIndexConfig, ServiceConfig, SingleIndexConfig};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a single-index configuration pointing at the mock server, with the
/// settle delay disabled.
pub fn single_config(server: &MockServer) -> SingleIndexConfig {
    SingleIndexConfig {
        service: ServiceConfig::with_host(server.uri()),
        timeout: None,
        ..Default::default()
    }
}

/// Builds a multi-index configuration pointing at the mock server, with the
/// settle delay disabled.
pub fn multi_config(
    server: &MockServer,
    data: BTreeMap<String, IndexDefinition>,
) -> MultiIndexConfig {
    MultiIndexConfig {
        service: ServiceConfig::with_host(server.uri()),
        data,
        timeout: None,
        ..Default::default()
    }
}

/// Answers `verb path` with `status` and a JSON body.
pub async fn mount_json(server: &MockServer, verb: &str, at: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Answers `verb path` with `status` and a raw text body.
pub async fn mount_text(server: &MockServer, verb: &str, at: &str, status: u16, body: &str) {
    Mock::given(method(verb))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Answers a HEAD probe of `at` with `status`.
pub async fn mount_head(server: &MockServer, at: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Acknowledged write response.
pub fn acknowledged() -> Value {
    json!({"ok": true, "acknowledged": true})
}

/// Shard summary returned by refresh.
pub fn shards_ok() -> Value {
    json!({"_shards": {"total": 10, "successful": 5, "failed": 0}})
}

/// Returns every received request as `(METHOD, path)` in arrival order.
pub async fn received(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect()
}

/// Returns the JSON bodies of received requests matching `verb path`.
pub async fn received_bodies(server: &MockServer, verb: &str, at: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == at)
        .map(|r| serde_json::from_slice(&r.body).unwrap_or(Value::Null))
        .collect()
}
