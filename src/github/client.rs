// GitHub API HTTP client.
// Handles authentication headers, URL building, status checking and response memoization.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderValue;
use serde_json::Value;
use url::Url;

use crate::cache::{CacheKey, CacheStore, DEFAULT_TTL, DiskStore, MemoryStore};
use crate::config::{CacheBackend, Config, DEFAULT_BASE_URL};
use crate::error::{ForgeError, Result};

use super::http::{HttpHeaders, HttpRequest, HttpTransport, ReqwestTransport};

pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
pub const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "github-forge";

/// GitHub API client with bearer authentication and optional response caching.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct ForgeClient {
    transport: Arc<dyn HttpTransport>,
    headers: HttpHeaders,
    base_url: String,
    cache: Option<Arc<dyn CacheStore>>,
    cache_ttl: Duration,
}

impl ForgeClient {
    /// Create a new client with the given token, talking to api.github.com over reqwest.
    pub fn new(token: &str) -> Result<Self> {
        Self::with_transport(token, Arc::new(ReqwestTransport::default()))
    }

    /// Create a client that sends its requests through `transport`.
    pub fn with_transport(token: &str, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(ForgeError::MissingToken);
        }

        let authorization = format!("Bearer {}", token);
        HeaderValue::from_str(&authorization)
            .map_err(|e| ForgeError::InvalidHeader(e.to_string()))?;

        let headers = vec![
            ("Accept".to_string(), GITHUB_ACCEPT.to_string()),
            ("Authorization".to_string(), authorization),
            (
                "X-GitHub-Api-Version".to_string(),
                GITHUB_API_VERSION.to_string(),
            ),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ];

        Ok(Self {
            transport,
            headers,
            base_url: DEFAULT_BASE_URL.to_string(),
            cache: None,
            cache_ttl: DEFAULT_TTL,
        })
    }

    /// Create a client from the token environment variables with default settings.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env(|name| std::env::var(name).ok());
        Self::from_config(&config)
    }

    /// Build a client (transport, base URL, cache) from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = match config.timeout() {
            Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
            None => ReqwestTransport::default(),
        };
        let client = Self::with_transport(config.token()?, Arc::new(transport))?
            .with_base_url(&config.base_url);

        let store: Option<Arc<dyn CacheStore>> = match config.cache {
            CacheBackend::None => None,
            CacheBackend::Memory => Some(Arc::new(MemoryStore::new())),
            CacheBackend::Disk => Some(Arc::new(DiskStore::default_location()?)),
        };

        Ok(match store {
            Some(store) => client.with_cache(store, config.cache_ttl()),
            None => client,
        })
    }

    /// Point the client at another API root (e.g. GitHub Enterprise).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Memoize every page and resource fetch in `store` for `ttl`.
    pub fn with_cache(mut self, store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        self.cache = Some(store);
        self.cache_ttl = ttl;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Build the full request URL from path segments (each percent-encoded)
    /// and query pairs (form-encoded, in the given order).
    ///
    /// Empty, `.` and `..` segments are rejected: the URL parser would drop
    /// them and the request would land on a different endpoint.
    pub fn url(&self, segments: &[&str], query: &[(&'static str, String)]) -> Result<String> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(ForgeError::InvalidArgument(format!(
                "invalid path segment '{}'",
                bad
            )));
        }

        let invalid = |reason: String| {
            ForgeError::InvalidArgument(format!("invalid base URL '{}': {}", self.base_url, reason))
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url.into())
    }

    /// Make a GET request and decode the JSON body. Any non-2xx status is an error.
    pub async fn get_json(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<Value> {
        let url = self.url(segments, query)?;
        tracing::debug!(url = %url, "GET");

        let response = self
            .transport
            .get(HttpRequest {
                url: url.clone(),
                headers: self.headers.clone(),
            })
            .await?;

        if !response.is_success() {
            tracing::debug!(url = %url, status = response.status, "request failed");
            return Err(ForgeError::Status {
                status: response.status,
                url,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }

    /// GET through the cache: a fresh entry under `key` is returned without a request.
    pub(crate) async fn fetch(
        &self,
        key: CacheKey,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<Value> {
        let key = key.param("base_url", &self.base_url).build();
        self.remember(&key, || self.get_json(segments, query)).await
    }

    /// Return the cached value for `key`, or run `producer` and cache its result.
    ///
    /// Errors from `producer` are returned and never cached. Cache backend
    /// failures only cost a miss.
    pub async fn remember<F, Fut>(&self, key: &str, producer: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        let Some(store) = &self.cache else {
            return producer().await;
        };

        match store.read(key, self.cache_ttl) {
            Ok(Some(value)) => {
                tracing::debug!(key, "cache hit");
                return Ok(value);
            }
            Ok(None) => tracing::debug!(key, "cache miss"),
            Err(e) => tracing::warn!(key, error = %e, "cache read failed"),
        }

        let value = producer().await?;

        if let Err(e) = store.write(key, &value) {
            tracing::warn!(key, error = %e, "cache write failed");
        }

        Ok(value)
    }
}
