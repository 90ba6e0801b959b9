//! reqwest-backed [`Fetch`] implementation.
//!
//! Catalog pages and search engines serve different (or no) markup to
//! unknown clients, so requests go out with browser-like headers. Redirects
//! are followed (short links, locale redirects); no cookie store is enabled,
//! so nothing leaks between unrelated resolutions sharing the pool.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;

use super::Fetch;
use crate::error::{Error, FetchError};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Browser User-Agent sent unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                                      (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Transport settings for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Timeout for a single request, well below the overall deadline
    pub request_timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Accept-Language header (pages are parsed against English phrasing)
    pub accept_language: String,
    /// Maximum redirects followed per request
    pub max_redirects: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en".to_string(),
            max_redirects: 10,
        }
    }
}

/// Pooled HTTP client, safe to share across concurrent resolutions.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Build a client from settings.
    pub fn new(settings: &HttpSettings) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&settings.accept_language)
                .map_err(|e| Error::Config(format!("accept_language: {e}")))?,
        );

        let inner = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .gzip(true)
            .timeout(settings.request_timeout)
            .connect_timeout(settings.request_timeout)
            .redirect(Policy::limited(settings.max_redirects))
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {e}")))?;

        Ok(Self { inner })
    }
}

#[async_trait]
impl Fetch for HttpClient {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url, "GET");

        let response = self.inner.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = HttpSettings::default();
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.accept_language, "en");
        assert_eq!(settings.max_redirects, 10);
        assert!(settings.user_agent.starts_with("Mozilla/5.0 ("));
    }

    #[test]
    fn test_client_creation() {
        assert!(HttpClient::new(&HttpSettings::default()).is_ok());
    }

    #[test]
    fn test_invalid_header_is_config_error() {
        let settings = HttpSettings {
            accept_language: "en\nX-Injected: 1".to_string(),
            ..Default::default()
        };
        assert!(matches!(HttpClient::new(&settings), Err(Error::Config(_))));
    }
}
