// src/probe/http.rs
// =============================================================================
// This module answers one question per URL: "does this page exist?"
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Wraps every request in a timeout; an expired request is dropped, which
//   cancels it and frees its connection and timer
// - Collapses every failure (404, timeout, DNS, TLS, bad URL) into `false`
// - Skips the network entirely for pages opened from disk
//
// Rust concepts:
// - Traits: the Probe trait lets tests swap in a fake checker
// - BoxFuture: an async method that can live behind `&dyn Probe`
// - tokio::time::timeout: races a future against a timer
// =============================================================================

use crate::config::Config;
use crate::error::Result;
use crate::location::ExecutionContext;
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// An existence check for a single URL.
///
/// Implementations must never fail: anything that goes wrong is `false`.
pub trait Probe: Send + Sync {
    fn exists<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, bool>;
}

/// The real checker: HEAD over HTTP with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    timeout: Duration,
    context: ExecutionContext,
}

impl HttpProbe {
    /// Builds a checker for pages running in `context`.
    ///
    /// The client is created once and cloned into every request (connection
    /// pooling), like the page loader does.
    pub fn new(config: &Config, context: ExecutionContext) -> Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            timeout: config.probe_timeout,
            context,
        })
    }

    async fn head(&self, url: &Url) -> bool {
        // file:// pages can't be checked over HTTP; assume everything exists
        // so local previews still show every language
        if self.context == ExecutionContext::Local {
            return true;
        }

        let request = self
            .client
            .head(url.as_str())
            .header(CACHE_CONTROL, "no-store")
            .send();

        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => {
                let status = response.status();
                debug!(url = %url, status = status.as_u16(), "probe answered");
                status.is_success()
            }
            Ok(Err(e)) => {
                debug!(url = %url, reason = categorize_error(&e), "probe failed");
                false
            }
            Err(_) => {
                debug!(url = %url, timeout_ms = self.timeout.as_millis() as u64, "probe timed out");
                false
            }
        }
    }
}

impl Probe for HttpProbe {
    fn exists<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, bool> {
        self.head(url).boxed()
    }
}

// Names the kind of failure for the logs. The answer is `false` either way.
fn categorize_error(error: &reqwest::Error) -> &'static str {
    let error_string = error.to_string().to_lowercase();

    if error.is_timeout() {
        "timeout"
    } else if error.is_redirect() {
        "too many redirects"
    } else if error.is_builder() {
        "malformed url"
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "dns error"
        } else {
            "connection failed"
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "tls error"
    } else {
        "request error"
    }
}
