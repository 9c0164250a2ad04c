//! Page fetchers
//!
//! A fetcher turns a URL into markup or fails. Two strategies exist:
//! - [`HttpFetcher`]: a plain GET request
//! - [`RenderedFetcher`]: asks a headless-browser render service for the
//!   page's final DOM after network activity settles, then pauses briefly
//!
//! Neither strategy retries on its own; wrap one in a
//! [`RetryingFetcher`](super::RetryingFetcher) for that.

use super::retry::{RetryPolicy, RetryingFetcher};
use crate::config::{Config, FetchStrategy, RenderConfig, UserAgentConfig};
use crate::{Result, SumiError};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{redirect::Policy, Client};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed by the HTTP client
const MAX_REDIRECTS: usize = 10;

/// Capability to retrieve the markup of a single page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` once, returning the page markup
    async fn fetch(&self, url: &Url) -> Result<String>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Box<T> {
    async fn fetch(&self, url: &Url) -> Result<String> {
        (**self).fetch(url).await
    }
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &Url) -> Result<String> {
        (**self).fetch(url).await
    }
}

/// Builds an HTTP client with a browser-like user agent
///
/// # Example
///
/// ```
/// use sumi_catalog::config::UserAgentConfig;
/// use sumi_catalog::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.value.clone())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Lightweight request/response fetch
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

/// Request body understood by the render service
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest<'a> {
    url: &'a str,
    goto_options: GotoOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: &'static str,
}

/// Rendered-page fetch through an external render service
///
/// The service loads the page in a headless browser, waits for network
/// idleness, and returns the serialized DOM. After each successful render the
/// fetcher sleeps for a random settle time within the configured bounds.
#[derive(Debug, Clone)]
pub struct RenderedFetcher {
    client: Client,
    endpoint: Url,
    settle_min: Duration,
    settle_max: Duration,
}

impl RenderedFetcher {
    pub fn new(client: Client, config: &RenderConfig) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: Url::parse(&config.endpoint)?,
            settle_min: Duration::from_millis(config.settle_min_ms),
            settle_max: Duration::from_millis(config.settle_max_ms),
        })
    }

    fn settle_time(&self) -> Duration {
        if self.settle_max <= self.settle_min {
            return self.settle_min;
        }
        rand::rng().random_range(self.settle_min..=self.settle_max)
    }
}

#[async_trait]
impl PageFetcher for RenderedFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let request = RenderRequest {
            url: url.as_str(),
            goto_options: GotoOptions {
                wait_until: "networkidle2",
            },
        };

        let response = self
            .client
            .post(self.endpoint.as_str())
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let markup = response.text().await?;

        let settle = self.settle_time();
        tracing::trace!("Settling {:?} after rendering {}", settle, url);
        tokio::time::sleep(settle).await;

        Ok(markup)
    }
}

/// Builds the retrying fetcher for the configured strategy
///
/// The strategy is fixed for the lifetime of the returned fetcher.
pub fn build_fetcher(config: &Config) -> Result<RetryingFetcher<Box<dyn PageFetcher>>> {
    let client = build_http_client(&config.user_agent)?;

    let inner: Box<dyn PageFetcher> = match config.crawler.fetch_strategy {
        FetchStrategy::Http => Box::new(HttpFetcher::new(client)),
        FetchStrategy::Rendered => {
            let render = config.render.as_ref().ok_or_else(|| {
                SumiError::Config(crate::ConfigError::Validation(
                    "fetch-strategy = \"rendered\" requires a [render] section".to_string(),
                ))
            })?;
            Box::new(RenderedFetcher::new(client, render)?)
        }
    };

    tracing::debug!(
        "Using {:?} fetch strategy with up to {} attempts",
        config.crawler.fetch_strategy,
        config.retry.max_attempts
    );

    Ok(RetryingFetcher::new(inner, RetryPolicy::from(&config.retry)))
}
