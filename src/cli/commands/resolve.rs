//! Link conversion and classification commands.

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::classify::{apple_track_index, classify, spotify_track_id};
use crate::config;
use crate::error::Error;
use crate::http::HttpClient;
use crate::resolver::Resolver;

const EXIT_TEMPFAIL: i32 = 75;

/// Resolve a link to the other catalog and print it
pub fn cmd_resolve(
    rt: &Runtime,
    url: &str,
    storefront: Option<&str>,
    timeout_ms: Option<u64>,
) -> anyhow::Result<()> {
    let config = config::load();

    let mut resolver_config = config.resolver_config();
    if let Some(ms) = timeout_ms {
        resolver_config.overall_timeout = Duration::from_millis(ms);
    }
    let storefront = storefront
        .map(str::to_string)
        .unwrap_or_else(|| resolver_config.default_storefront.clone());

    let client = HttpClient::new(&config.http_settings())?;
    let resolver = Resolver::new(resolver_config, Arc::new(client));

    rt.block_on(async {
        match resolver.convert(url, &storefront).await {
            Ok(link) => {
                println!("{}", link);
                Ok(())
            }
            Err(e) => {
                tracing::debug!("Resolution failed: {}", e);
                eprintln!("{}", e.user_message());
                std::process::exit(exit_code(&e));
            }
        }
    })
}

/// Process exit code for a failed resolution: 75 (EX_TEMPFAIL) when a retry
/// may succeed, 1 otherwise.
pub(crate) fn exit_code(error: &Error) -> i32 {
    if error.is_retryable() { EXIT_TEMPFAIL } else { 1 }
}

/// Print the classification of a link and any IDs found in it
pub fn cmd_classify(url: &str) -> anyhow::Result<()> {
    let kind = classify(url);
    println!("Kind:       {}", kind);
    println!("Resolvable: {}", if kind.is_resolvable() { "yes" } else { "no" });
    if let Some(catalog) = kind.catalog() {
        println!("Catalog:    {}", catalog);
    }
    if let Some(id) = apple_track_index(url) {
        println!("Track index: {}", id);
    }
    if let Some(id) = spotify_track_id(url) {
        println!("Track ID:   {}", id);
    }
    Ok(())
}
