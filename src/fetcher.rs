//! Page retrieval over HTTP
//!
//! [`PageFetcher`] is the seam between the pipeline and the network. The
//! production implementation, [`HttpFetcher`], wraps one `reqwest::Client`
//! (and therefore one connection pool) and applies the request headers the
//! upstream site expects for each kind of page.

use crate::config::ScrapeConfig;
use crate::error::{PageKind, Result, TransportError};
use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Trait for retrieving page markup
///
/// Implementations return the response body as text, or a
/// [`crate::Error::Transport`] when the page could not be retrieved.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`, which is a page of the given kind
    async fn fetch(&self, url: &Url, kind: PageKind) -> Result<String>;
}

/// `reqwest`-backed [`PageFetcher`]
///
/// Cloning is cheap and shares the connection pool. The pool is released when
/// the last clone is dropped.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    listing_headers: HeaderMap,
    detail_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    /// Create a fetcher from the request settings
    ///
    /// # Errors
    /// Returns error if a configured header value is not valid HTTP or the
    /// HTTP client cannot be created
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        let mut listing_headers = HeaderMap::new();
        listing_headers.insert(
            ACCEPT_LANGUAGE,
            header_value(&config.accept_language, "scrape.accept_language")?,
        );

        let mut detail_headers = HeaderMap::new();
        detail_headers.insert(
            USER_AGENT,
            header_value(&config.user_agent, "scrape.user_agent")?,
        );

        Ok(Self {
            client,
            listing_headers,
            detail_headers,
            timeout: config.fetch_timeout,
        })
    }

    async fn get(&self, url: &Url, headers: HeaderMap) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;

        // Check HTTP status before reading the body
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;

        debug!(url = %url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, kind: PageKind) -> Result<String> {
        let headers = match kind {
            PageKind::Listing => self.listing_headers.clone(),
            PageKind::Detail => self.detail_headers.clone(),
        };

        match self.timeout {
            Some(after) => tokio::time::timeout(after, self.get(url, headers))
                .await
                .map_err(|_| TransportError::Timeout {
                    url: url.to_string(),
                    after,
                })?,
            None => self.get(url, headers).await,
        }
    }
}

fn header_value(value: &str, key: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| crate::Error::Config {
        message: format!("invalid header value {:?}: {}", value, e),
        key: Some(key.to_string()),
    })
}
