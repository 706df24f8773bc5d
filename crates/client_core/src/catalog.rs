//! HTTP client for the JSONPlaceholder and DummyJSON catalogs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, RequestBuilder,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Comment, Post, PostId, Product, ProductId, Quote, QuoteId, User, UserId},
    error::FetchError,
    protocol::{PageParams, ProductCategory, ProductsPage, QuotesPage, SearchParams},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const JSONPLACEHOLDER_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DUMMYJSON_URL: &str = "https://dummyjson.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote operations the source strategies depend on.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError>;
    async fn list_users(&self) -> Result<Vec<User>, FetchError>;
    async fn list_products(&self, limit: u32, skip: u32) -> Result<ProductsPage, FetchError>;
    async fn search_products(
        &self,
        text: &str,
        limit: u32,
        skip: u32,
    ) -> Result<ProductsPage, FetchError>;
    async fn list_quotes(&self, limit: u32, skip: u32) -> Result<QuotesPage, FetchError>;
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub jsonplaceholder_url: String,
    pub dummyjson_url: String,
    pub request_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            jsonplaceholder_url: JSONPLACEHOLDER_URL.into(),
            dummyjson_url: DUMMYJSON_URL.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogSetupError {
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("base url '{0}' cannot carry a path")]
    OpaqueBaseUrl(String),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

pub struct HttpCatalog {
    http: Client,
    jsonplaceholder: Url,
    dummyjson: Url,
}

impl HttpCatalog {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogSetupError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            jsonplaceholder: parse_base_url(&config.jsonplaceholder_url)?,
            dummyjson: parse_base_url(&config.dummyjson_url)?,
        })
    }

    pub async fn get_post(&self, id: PostId) -> Result<Post, FetchError> {
        let url = endpoint(&self.jsonplaceholder, &["posts", &id.to_string()]);
        self.send_json(self.http.get(url)).await
    }

    pub async fn post_comments(&self, id: PostId) -> Result<Vec<Comment>, FetchError> {
        let url = endpoint(&self.jsonplaceholder, &["posts", &id.to_string(), "comments"]);
        self.send_json(self.http.get(url)).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<User, FetchError> {
        let url = endpoint(&self.jsonplaceholder, &["users", &id.to_string()]);
        self.send_json(self.http.get(url)).await
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, FetchError> {
        let url = endpoint(&self.dummyjson, &["products", &id.to_string()]);
        self.send_json(self.http.get(url)).await
    }

    pub async fn product_categories(&self) -> Result<Vec<ProductCategory>, FetchError> {
        let url = endpoint(&self.dummyjson, &["products", "categories"]);
        self.send_json(self.http.get(url)).await
    }

    pub async fn products_by_category(
        &self,
        category: &str,
        limit: u32,
        skip: u32,
    ) -> Result<ProductsPage, FetchError> {
        let url = endpoint(&self.dummyjson, &["products", "category", category]);
        self.send_json(self.http.get(url).query(&PageParams { limit, skip }))
            .await
    }

    pub async fn get_quote(&self, id: QuoteId) -> Result<Quote, FetchError> {
        let url = endpoint(&self.dummyjson, &["quotes", &id.to_string()]);
        self.send_json(self.http.get(url)).await
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, FetchError> {
        let request = builder
            .build()
            .map_err(|err| FetchError::Unknown(err.to_string()))?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending catalog request");

        let result: Result<T, FetchError> = async {
            let response = self
                .http
                .execute(request)
                .await
                .map_err(|err| classify_transport_error(&err))?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::from_status(status.as_u16()));
            }
            response
                .json::<T>()
                .await
                .map_err(|err| classify_transport_error(&err))
        }
        .await;

        if let Err(err) = &result {
            warn!(
                %method,
                %url,
                status = err.status(),
                detail = err.detail(),
                "catalog request failed: {err}"
            );
        }
        result
    }
}

#[async_trait]
impl RemoteCatalog for HttpCatalog {
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError> {
        let url = endpoint(&self.jsonplaceholder, &["posts"]);
        self.send_json(self.http.get(url)).await
    }

    async fn list_users(&self) -> Result<Vec<User>, FetchError> {
        let url = endpoint(&self.jsonplaceholder, &["users"]);
        self.send_json(self.http.get(url)).await
    }

    async fn list_products(&self, limit: u32, skip: u32) -> Result<ProductsPage, FetchError> {
        let url = endpoint(&self.dummyjson, &["products"]);
        self.send_json(self.http.get(url).query(&PageParams { limit, skip }))
            .await
    }

    async fn search_products(
        &self,
        text: &str,
        limit: u32,
        skip: u32,
    ) -> Result<ProductsPage, FetchError> {
        let url = endpoint(&self.dummyjson, &["products", "search"]);
        self.send_json(
            self.http
                .get(url)
                .query(&SearchParams { q: text, limit, skip }),
        )
        .await
    }

    async fn list_quotes(&self, limit: u32, skip: u32) -> Result<QuotesPage, FetchError> {
        let url = endpoint(&self.dummyjson, &["quotes"]);
        self.send_json(self.http.get(url).query(&PageParams { limit, skip }))
            .await
    }
}

/// Maps a transport-level failure onto the fetch error taxonomy.
pub fn classify_transport_error(err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = err.status() {
        FetchError::from_status(status.as_u16())
    } else if err.is_connect() || err.is_request() {
        FetchError::NetworkUnreachable
    } else {
        FetchError::Unknown(err.to_string())
    }
}

fn parse_base_url(raw: &str) -> Result<Url, CatalogSetupError> {
    let url = Url::parse(raw.trim()).map_err(|source| CatalogSetupError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(CatalogSetupError::OpaqueBaseUrl(raw.to_string()));
    }
    Ok(url)
}

fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
