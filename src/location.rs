// src/location.rs
// =============================================================================
// Where the page under inspection lives.
//
// A page is either served over the network (http/https) or opened straight
// from disk (file://). The two behave differently:
// - network pages have a server-rooted path we can rebuild segment by segment
// - local pages have a filesystem path, and existence can't be probed over
//   HTTP, so probes optimistically succeed
// =============================================================================

use crate::error::{GuardError, Result};
use serde::Serialize;
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionContext {
    /// Page served over http(s)
    Network,
    /// Page opened from the local filesystem (file://)
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
    context: ExecutionContext,
}

impl PageLocation {
    /// Parses a location given on the command line.
    ///
    /// Accepts `http://`, `https://` and `file://` URLs, or a plain
    /// filesystem path (relative paths are resolved against the current
    /// directory).
    pub fn parse(input: &str) -> Result<Self> {
        match Url::parse(input) {
            Ok(url) => Self::from_url(url),
            // No scheme: treat it as a path on disk
            Err(url::ParseError::RelativeUrlWithoutBase) => Self::from_path(Path::new(input)),
            Err(e) => Err(GuardError::InvalidLocation(input.to_string(), e.to_string())),
        }
    }

    pub fn from_url(url: Url) -> Result<Self> {
        let context = match url.scheme() {
            "http" | "https" => ExecutionContext::Network,
            "file" => ExecutionContext::Local,
            other => {
                return Err(GuardError::InvalidLocation(
                    url.to_string(),
                    format!("unsupported scheme '{}'", other),
                ))
            }
        };

        if url.cannot_be_a_base() {
            return Err(GuardError::InvalidLocation(
                url.to_string(),
                "URL has no path".to_string(),
            ));
        }

        Ok(Self { url, context })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let url = Url::from_file_path(&absolute).map_err(|_| {
            GuardError::InvalidLocation(
                path.display().to_string(),
                "not a valid file path".to_string(),
            )
        })?;

        Ok(Self {
            url,
            context: ExecutionContext::Local,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    pub fn is_local(&self) -> bool {
        self.context == ExecutionContext::Local
    }

    /// Two URLs are same-origin when scheme, host and port agree.
    ///
    /// file:// URLs have opaque origins in the `url` crate (never equal to
    /// anything), so any file:// target counts as same-origin with a local page.
    pub fn is_same_origin(&self, other: &Url) -> bool {
        if self.is_local() {
            return other.scheme() == "file";
        }
        self.url.origin() == other.origin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_network_location() {
        let location = PageLocation::parse("https://example.com/fr/about.html").unwrap();
        assert_eq!(location.context(), ExecutionContext::Network);
        assert_eq!(location.url().path(), "/fr/about.html");
    }

    #[test]
    fn test_parse_file_url() {
        let location = PageLocation::parse("file:///srv/site/fr/about.html").unwrap();
        assert!(location.is_local());
    }

    #[test]
    fn test_parse_plain_path_is_local() {
        let location = PageLocation::parse("/srv/site/en/index.html").unwrap();
        assert!(location.is_local());
        assert_eq!(location.url().scheme(), "file");
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(PageLocation::parse("ftp://example.com/fr/").is_err());
        assert!(PageLocation::parse("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_same_origin() {
        let location = PageLocation::parse("https://example.com/fr/").unwrap();
        assert!(location.is_same_origin(&Url::parse("https://example.com/en/a.html").unwrap()));
        assert!(!location.is_same_origin(&Url::parse("http://example.com/en/a.html").unwrap()));
        assert!(!location.is_same_origin(&Url::parse("https://example.com:8443/en/").unwrap()));
        assert!(!location.is_same_origin(&Url::parse("https://other.com/en/").unwrap()));
    }

    #[test]
    fn test_local_pages_treat_files_as_same_origin() {
        let location = PageLocation::parse("file:///srv/site/fr/index.html").unwrap();
        assert!(location.is_same_origin(&Url::parse("file:///srv/site/en/index.html").unwrap()));
        assert!(!location.is_same_origin(&Url::parse("https://example.com/en/").unwrap()));
    }
}
