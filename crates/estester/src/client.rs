//! Thin HTTP wrapper around the search service.
//!
//! Each verb returns the decoded JSON body on a 2xx response and
//! [`EsError::Service`] with the raw response text otherwise. There is no retry
//! or backoff: a failure is handed straight back to the caller.

use std::fmt::Debug;

use reqwest::{Method, Proxy, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::ServiceConfig;
use crate::error::{EsError, EsResult};

/// HTTP client bound to one service base URL.
#[derive(Clone)]
pub struct EsClient {
    http: reqwest::Client,
    base: Url,
}

impl Debug for EsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EsClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl EsClient {
    /// Builds a client from the connection settings.
    pub fn new(config: &ServiceConfig) -> EsResult<Self> {
        let base = config.base_url()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        for (scheme, proxy_url) in &config.proxies {
            let proxy = match scheme.as_str() {
                "http" => Proxy::http(proxy_url),
                "https" => Proxy::https(proxy_url),
                "all" => Proxy::all(proxy_url),
                other => {
                    return Err(EsError::Config(format!("unknown proxy scheme '{}'", other)));
                }
            }
            .map_err(|e| EsError::Config(format!("invalid proxy '{}': {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| EsError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base })
    }

    /// Returns the base URL, always ending with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Builds a URL below the base from raw path segments.
    ///
    /// Every segment is percent-encoded on its own, so a segment containing
    /// `/` stays one segment.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issues a HEAD request and returns the status, whatever it is.
    pub async fn head(&self, segments: &[&str]) -> EsResult<StatusCode> {
        let url = self.url(segments);
        let response = self.http.head(url.clone()).send().await?;
        let status = response.status();
        debug!(method = "HEAD", url = %url, status = status.as_u16(), "search service request");
        Ok(status)
    }

    /// Issues a GET request.
    pub async fn get(&self, segments: &[&str]) -> EsResult<Value> {
        self.get_with_query(segments, &[]).await
    }

    /// Issues a GET request with query-string parameters.
    pub async fn get_with_query(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> EsResult<Value> {
        let mut url = self.url(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        self.send(Method::GET, url, None).await
    }

    /// Issues a PUT request with a JSON body.
    pub async fn put(&self, segments: &[&str], body: &Value) -> EsResult<Value> {
        self.send(Method::PUT, self.url(segments), Some(body)).await
    }

    /// Issues a POST request with a JSON body.
    pub async fn post(&self, segments: &[&str], body: &Value) -> EsResult<Value> {
        self.send(Method::POST, self.url(segments), Some(body)).await
    }

    /// Issues a POST request with query-string parameters and a JSON body.
    pub async fn post_with_query(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        body: &Value,
    ) -> EsResult<Value> {
        let mut url = self.url(segments);
        url.query_pairs_mut().extend_pairs(query);
        self.send(Method::POST, url, Some(body)).await
    }

    /// Issues a POST request without a body.
    pub async fn post_empty(&self, segments: &[&str]) -> EsResult<Value> {
        self.send(Method::POST, self.url(segments), None).await
    }

    /// Issues a DELETE request.
    pub async fn delete(&self, segments: &[&str]) -> EsResult<Value> {
        self.send(Method::DELETE, self.url(segments), None).await
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> EsResult<Value> {
        let mut request: RequestBuilder = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            "search service request"
        );

        if !status.is_success() {
            return Err(EsError::service(status, text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
