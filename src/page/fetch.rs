// src/page/fetch.rs
// =============================================================================
// Loads the HTML of the page we're inspecting.
//
// - network pages: a plain GET, which must answer 2xx within the configured
//   page timeout
// - local pages: read straight from disk
// =============================================================================

use crate::config::Config;
use crate::error::{GuardError, Result};
use crate::location::{ExecutionContext, PageLocation};
use reqwest::Client;
use tracing::info;

/// Fetches the page HTML for `location`.
pub async fn load_page(location: &PageLocation, config: &Config) -> Result<String> {
    match location.context() {
        ExecutionContext::Network => fetch_page(location, config).await,
        ExecutionContext::Local => read_page(location).await,
    }
}

async fn fetch_page(location: &PageLocation, config: &Config) -> Result<String> {
    let client = Client::builder().timeout(config.page_timeout).build()?;

    info!(page = %location.url(), "fetching page");
    let response = client.get(location.url().as_str()).send().await?;

    if !response.status().is_success() {
        return Err(GuardError::PageLoad(
            location.url().to_string(),
            format!("HTTP {}", response.status()),
        ));
    }

    Ok(response.text().await?)
}

async fn read_page(location: &PageLocation) -> Result<String> {
    let path = location.url().to_file_path().map_err(|_| {
        GuardError::PageLoad(
            location.url().to_string(),
            "not a local file path".to_string(),
        )
    })?;

    info!(path = %path.display(), "reading page");
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| GuardError::PageLoad(path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_fetches_network_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fr/index.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<a href=\"/en/\">EN</a>"))
            .mount(&server)
            .await;

        let location = PageLocation::parse(&format!("{}/fr/index.html", server.uri())).unwrap();
        let html = load_page(&location, &Config::default()).await.unwrap();
        assert!(html.contains("/en/"));
    }

    #[tokio::test]
    async fn test_missing_network_page_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let location = PageLocation::parse(&format!("{}/fr/gone.html", server.uri())).unwrap();
        let err = load_page(&location, &Config::default()).await.unwrap_err();
        assert!(matches!(err, GuardError::PageLoad(_, _)));
    }

    #[tokio::test]
    async fn test_slow_network_page_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let location = PageLocation::parse(&format!("{}/fr/index.html", server.uri())).unwrap();
        let config = Config::default().with_page_timeout(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let err = load_page(&location, &config).await.unwrap_err();
        assert!(matches!(err, GuardError::Http(_)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_reads_local_page() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "<p>bonjour</p>").unwrap();

        let location = PageLocation::from_path(&file).unwrap();
        assert_eq!(load_page(&location, &Config::default()).await.unwrap(), "<p>bonjour</p>");
    }

    #[tokio::test]
    async fn test_missing_local_page_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let location = PageLocation::from_path(&dir.path().join("nope.html")).unwrap();
        assert!(load_page(&location, &Config::default()).await.is_err());
    }
}
