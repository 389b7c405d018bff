//! Remote directory API client.
//!
//! Three read-only endpoints:
//! - `GET {base}/categories`   → `[{name, file}]`
//! - `GET {base}/list/{file}`  → `[username]`
//! - `GET {base}/search?q=...` → `[{username, category}]`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    error::AppError,
    model::category::{Category, SearchResult},
};

const USER_AGENT_VALUE: &str = concat!("dirview/", env!("CARGO_PKG_VERSION"));

/// Source of directory data. The controller only ever talks to this trait.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn categories(&self) -> Result<Vec<Category>, AppError>;

    async fn list(&self, file: &str) -> Result<Vec<String>, AppError>;

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, AppError>;
}

#[derive(Debug, Clone)]
pub struct HttpDirectoryApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpDirectoryApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let base = Url::parse(base_url).map_err(|e| AppError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(AppError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::http(base_url, e))?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn categories_url(&self) -> Url {
        self.endpoint(&["categories"])
    }

    pub fn list_url(&self, file: &str) -> Url {
        self.endpoint(&["list", file])
    }

    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint(&["search"]);
        url.query_pairs_mut().append_pair("q", query);
        url
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, AppError> {
        let endpoint = url.path().to_string();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::http(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::status(endpoint, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::http(&endpoint, e))?;
        debug!(endpoint, bytes = body.len(), "Directory API response received");

        serde_json::from_slice(&body).map_err(|e| AppError::decode(endpoint, e))
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryApi {
    #[instrument(level = "debug", skip(self))]
    async fn categories(&self) -> Result<Vec<Category>, AppError> {
        self.fetch_json(self.categories_url()).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn list(&self, file: &str) -> Result<Vec<String>, AppError> {
        self.fetch_json(self.list_url(file)).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, AppError> {
        self.fetch_json(self.search_url(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpDirectoryApi {
        HttpDirectoryApi::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_endpoints_extend_base_path() {
        let api = api("https://example.com/api");
        assert_eq!(api.categories_url().as_str(), "https://example.com/api/categories");
        assert_eq!(api.list_url("artists").as_str(), "https://example.com/api/list/artists");
    }

    #[test]
    fn test_trailing_slash_base() {
        let api = api("https://example.com/api/");
        assert_eq!(api.categories_url().as_str(), "https://example.com/api/categories");
    }

    #[test]
    fn test_search_query_is_escaped() {
        let api = api("https://example.com/api");
        let url = api.search_url("a&b c/?");
        assert_eq!(url.as_str(), "https://example.com/api/search?q=a%26b+c%2F%3F");
        assert_eq!(
            url.query_pairs().next().map(|(_, v)| v.into_owned()),
            Some("a&b c/?".to_string())
        );
    }

    #[test]
    fn test_list_file_is_a_single_segment() {
        let api = api("https://example.com/api");
        assert_eq!(
            api.list_url("../x y").as_str(),
            "https://example.com/api/list/..%2Fx%20y"
        );
    }

    #[test]
    fn test_rejects_non_hierarchical_base() {
        assert!(matches!(
            HttpDirectoryApi::new("mailto:someone@example.com", Duration::from_secs(1)),
            Err(AppError::InvalidUrl { .. })
        ));
        assert!(HttpDirectoryApi::new("not a url", Duration::from_secs(1)).is_err());
    }
}
