//! Mock transport for tests.
//!
//! Serves canned bodies by URL prefix and records every requested URL so
//! tests can assert on strategy order.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::Fetch;
use crate::error::FetchError;

/// Mock [`Fetch`] answering from a prefix table.
///
/// The longest matching prefix wins; unmatched URLs answer HTTP 404.
#[derive(Default)]
pub struct MockFetch {
    routes: Vec<(String, Result<String, FetchError>)>,
    hang: bool,
    requests: Mutex<Vec<String>>,
}

impl MockFetch {
    /// A mock with no routes: every request is a 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose requests never complete.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    /// Answer URLs starting with `prefix` with `body`.
    pub fn route(mut self, prefix: &str, body: &str) -> Self {
        self.routes.push((prefix.to_string(), Ok(body.to_string())));
        self
    }

    /// Answer URLs starting with `prefix` with `error`.
    pub fn fail(mut self, prefix: &str, error: FetchError) -> Self {
        self.routes.push((prefix.to_string(), Err(error)));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Whether any requested URL starts with `prefix`.
    pub fn was_requested(&self, prefix: &str) -> bool {
        self.requests.lock().iter().any(|u| u.starts_with(prefix))
    }
}

#[async_trait]
impl Fetch for MockFetch {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().push(url.to_string());

        if self.hang {
            std::future::pending::<()>().await;
        }

        self.routes
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, answer)| answer.clone())
            .unwrap_or(Err(FetchError::Status(404)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let mock = MockFetch::new()
            .route("https://a.test/", "short")
            .route("https://a.test/long", "long");
        assert_eq!(mock.get_text("https://a.test/longer").await.unwrap(), "long");
        assert_eq!(mock.get_text("https://a.test/x").await.unwrap(), "short");
    }

    #[tokio::test]
    async fn test_unmatched_is_404_and_recorded() {
        let mock = MockFetch::new();
        let result = mock.get_text("https://nowhere.test/").await;
        assert_eq!(result, Err(FetchError::Status(404)));
        assert_eq!(mock.requests(), vec!["https://nowhere.test/".to_string()]);
        assert!(mock.was_requested("https://nowhere"));
    }
}
