// src/i18n/discover.rs
// =============================================================================
// Finds out which language versions of the current page really exist.
//
// For each supported language we build the localized URL, probe it, and keep
// the ones that answer. The probes go through the bounded window so a site
// with many languages doesn't open many connections at once.
//
// A switcher with a single entry is useless, so the menu reports whether it
// is worth showing at all (two options or more).
// =============================================================================

use crate::config::{Config, LanguageCode};
use crate::i18n::path::{build_localized_href, detect_language};
use crate::location::PageLocation;
use crate::page::escape_attr;
use crate::probe::{map_bounded, Probe};
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

/// One entry of the language switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub code: LanguageCode,
    pub href: Url,
    /// True for the language of the page we're on
    pub active: bool,
}

/// The verified options, in configured language order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LanguageMenu {
    pub options: Vec<LanguageOption>,
}

impl LanguageMenu {
    pub fn is_worth_showing(&self) -> bool {
        self.options.len() >= 2
    }

    pub fn active(&self) -> Option<&LanguageOption> {
        self.options.iter().find(|option| option.active)
    }

    /// Renders the switcher widget, or `None` when it should be suppressed.
    pub fn render_html(&self, config: &Config) -> Option<String> {
        if !self.is_worth_showing() {
            return None;
        }

        let mut html = String::from(
            "<div id=\"lang-switcher\" style=\"display: flex; gap: 8px; align-items: center\">",
        );
        for option in &self.options {
            let class = if option.active { "lang-btn active" } else { "lang-btn" };
            html.push_str(&format!(
                "<a class=\"{class}\" href=\"{href}\" title=\"Show the {code} version\" aria-label=\"Switch to {code}\">{flag}<span class=\"sr-only\">{code}</span></a>",
                class = class,
                href = escape_attr(option.href.as_str()),
                code = option.code,
                flag = config.flag_for(&option.code),
            ));
        }
        html.push_str("</div>");
        Some(html)
    }
}

/// Probes every supported language and returns the ones that exist.
pub async fn discover_languages(location: &PageLocation, config: &Config, probe: &dyn Probe) -> LanguageMenu {
    let current = detect_language(location.url(), &config.languages);
    info!(
        page = %location.url(),
        current = current.map(LanguageCode::as_str).unwrap_or("none"),
        "discovering language versions"
    );

    let checked = map_bounded(config.languages.iter(), config.concurrency, |code| async move {
        let href = build_localized_href(location, code, config);
        let exists = probe.exists(&href).await;
        debug!(language = %code, href = %href, exists, "language probe");
        (code, href, exists)
    })
    .await;

    let options: Vec<LanguageOption> = checked
        .into_iter()
        .filter(|(_, _, exists)| *exists)
        .map(|(code, href, _)| LanguageOption {
            active: Some(code) == current,
            code: code.clone(),
            href,
        })
        .collect();

    info!(found = options.len(), of = config.languages.len(), "language discovery finished");
    LanguageMenu { options }
}
