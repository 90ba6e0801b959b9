//! HTTP transport for the pipeline.
//!
//! Strategies never talk to `reqwest` directly. They go through the [`Fetch`]
//! capability, so tests can substitute canned responses and the resolver can
//! share one pooled client across concurrent resolutions.

mod client;
#[cfg(test)]
pub mod mocks;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::FetchError;

pub use client::{DEFAULT_USER_AGENT, HttpClient, HttpSettings};

/// Minimal GET capability used by every strategy.
///
/// Implementations must be safe to share between independent resolution
/// calls and must not carry cookies or session state between them.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET `url` and return the body as text. Non-2xx statuses are errors.
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

/// GET `url` and decode the body as JSON into `T`.
pub async fn get_json<T: DeserializeOwned>(fetch: &dyn Fetch, url: &str) -> Result<T, FetchError> {
    let body = fetch.get_text(url).await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::mocks::MockFetch;
    use super::*;

    #[derive(serde::Deserialize)]
    struct Payload {
        title: String,
    }

    #[tokio::test]
    async fn test_get_json_decodes() {
        let fetch = MockFetch::new().route("https://x.test/", r#"{"title":"Hello"}"#);
        let payload: Payload = get_json(&fetch, "https://x.test/a").await.unwrap();
        assert_eq!(payload.title, "Hello");
    }

    #[tokio::test]
    async fn test_get_json_parse_error() {
        let fetch = MockFetch::new().route("https://x.test/", "<html>");
        let result: Result<Payload, _> = get_json(&fetch, "https://x.test/a").await;
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }
}
