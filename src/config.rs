// src/config.rs
// =============================================================================
// Startup configuration: which languages the site has, how many probes may
// run at once, how long a probe may take, and the flag icon for each language.
//
// The Config is built once in main(), validated, and then only ever borrowed
// (&Config) by the probing / repair code. Nothing here changes at runtime.
//
// Rust concepts:
// - Newtypes: LanguageCode wraps a String but can only be built validated
// - FromStr: lets clap (and tests) parse "en,fr,gk" straight into a type
// - Default: the site's stock settings
// =============================================================================

use crate::error::{GuardError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Maximum number of probes in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Per-probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Timeout for loading the page itself (the GET, not the probes).
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Page appended when a location has no file component.
pub const DEFAULT_INDEX_PAGE: &str = "index.html";

/// Languages the site ships with, in switcher / fallback order.
pub const DEFAULT_LANGUAGES: [&str; 3] = ["en", "fr", "gk"];

const FLAG_EN: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 60 30" role="img"><title>Union Flag</title><rect width="60" height="30" fill="#012169"/><g fill="none" stroke-linecap="square"><path d="M0 0 L60 30 M60 0 L0 30" stroke="#fff" stroke-width="6"/><path d="M0 0 L60 30 M60 0 L0 30" stroke="#C8102E" stroke-width="4"/><path d="M30 0 L30 30 M0 15 L60 15" stroke="#fff" stroke-width="10"/><path d="M30 0 L30 30 M0 15 L60 15" stroke="#C8102E" stroke-width="6"/></g></svg>"##;

const FLAG_FR: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 3 2"><rect width="1" height="2" x="0" fill="#0055A4"/><rect width="1" height="2" x="1" fill="#fff"/><rect width="1" height="2" x="2" fill="#EF4135"/></svg>"##;

const FLAG_GK: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 27 18" role="img"><title>Flag of Greece</title><rect width="27" height="18" fill="#fff"/><g fill="#0D5EAF"><rect y="0" width="27" height="2"/><rect y="4" width="27" height="2"/><rect y="8" width="27" height="2"/><rect y="12" width="27" height="2"/><rect y="16" width="27" height="2"/><rect width="10" height="10"/></g><rect x="4" width="2" height="10" fill="#fff"/><rect y="4" width="10" height="2" fill="#fff"/></svg>"##;

/// A supported language identifier, used verbatim as a path segment.
///
/// Only ASCII lowercase letters, digits, `-` and `_` are allowed, so a code
/// can never contain `/` or `.` and never be confused with a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.is_empty() {
            return Err(GuardError::InvalidLanguage(
                code.to_string(),
                "code is empty".to_string(),
            ));
        }

        let valid = code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(GuardError::InvalidLanguage(
                code.to_string(),
                "only lowercase letters, digits, '-' and '_' are allowed".to_string(),
            ));
        }

        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for LanguageCode {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// The closed, ordered set of languages the site supports.
///
/// Order matters: it is the order options are listed in and the order
/// alternates are tried when a link is broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSet(Vec<LanguageCode>);

impl LanguageSet {
    pub fn new(codes: Vec<LanguageCode>) -> Result<Self> {
        if codes.is_empty() {
            return Err(GuardError::InvalidConfig(
                "at least one language is required".to_string(),
            ));
        }

        let mut seen = Vec::with_capacity(codes.len());
        for code in codes {
            if seen.contains(&code) {
                return Err(GuardError::InvalidConfig(format!(
                    "language '{}' is listed twice",
                    code
                )));
            }
            seen.push(code);
        }

        Ok(Self(seen))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageCode> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a path segment; returns the matching code if it is one of ours.
    pub fn find(&self, segment: &str) -> Option<&LanguageCode> {
        self.0.iter().find(|code| code.as_str() == segment)
    }

    pub fn contains(&self, segment: &str) -> bool {
        self.find(segment).is_some()
    }

    /// Every language except `current`, in configured order.
    pub fn others<'a>(&'a self, current: &'a LanguageCode) -> impl Iterator<Item = &'a LanguageCode> {
        self.0.iter().filter(move |code| *code != current)
    }
}

impl Default for LanguageSet {
    fn default() -> Self {
        Self(
            DEFAULT_LANGUAGES
                .iter()
                .map(|code| LanguageCode(code.to_string()))
                .collect(),
        )
    }
}

impl FromStr for LanguageSet {
    type Err = GuardError;

    // "en,fr,gk" -> [en, fr, gk]
    fn from_str(s: &str) -> Result<Self> {
        let codes = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(LanguageCode::new)
            .collect::<Result<Vec<_>>>()?;
        Self::new(codes)
    }
}

/// Everything the probing and repair passes need to know up front.
#[derive(Debug, Clone)]
pub struct Config {
    pub languages: LanguageSet,
    /// Maximum number of in-flight probes (the concurrency window size)
    pub concurrency: usize,
    pub probe_timeout: Duration,
    pub page_timeout: Duration,
    pub index_page: String,
    /// Icon markup per language code; languages without one get a text badge
    pub flags: HashMap<LanguageCode, String>,
}

impl Default for Config {
    fn default() -> Self {
        let mut flags = HashMap::new();
        for (code, svg) in DEFAULT_LANGUAGES.iter().zip([FLAG_EN, FLAG_FR, FLAG_GK]) {
            flags.insert(LanguageCode(code.to_string()), svg.to_string());
        }

        Self {
            languages: LanguageSet::default(),
            concurrency: DEFAULT_CONCURRENCY,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            index_page: DEFAULT_INDEX_PAGE.to_string(),
            flags,
        }
    }
}

impl Config {
    pub fn with_languages(mut self, languages: LanguageSet) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    pub fn with_index_page(mut self, index_page: impl Into<String>) -> Self {
        self.index_page = index_page.into();
        self
    }

    /// Checks the settings that clap can't check for us.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(GuardError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.probe_timeout.is_zero() {
            return Err(GuardError::InvalidConfig(
                "probe timeout must be greater than zero".to_string(),
            ));
        }
        if self.page_timeout.is_zero() {
            return Err(GuardError::InvalidConfig(
                "page timeout must be greater than zero".to_string(),
            ));
        }
        if self.index_page.is_empty() || self.index_page.contains('/') {
            return Err(GuardError::InvalidConfig(format!(
                "index page '{}' must be a plain file name",
                self.index_page
            )));
        }
        Ok(())
    }

    /// Icon markup for a language, or a plain text badge when none is configured.
    pub fn flag_for(&self, code: &LanguageCode) -> String {
        match self.flags.get(code) {
            Some(svg) => svg.clone(),
            None => format!("<span class=\"lang-badge\">{}</span>", code.as_str().to_uppercase()),
        }
    }
}
