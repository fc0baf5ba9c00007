// src/page/html.rs
// =============================================================================
// This module pulls the links out of the page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Unlike a plain link extractor we keep the href exactly as written (not
// resolved), because that's the value a repair has to replace.
// =============================================================================

use scraper::{Html, Selector};
use serde::Serialize;

/// One `<a href>` of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorRecord {
    /// Position among the page's `<a href>` elements, in document order
    pub index: usize,
    /// The href attribute as written (entities decoded)
    pub href: String,
    /// Visible link text, whitespace-collapsed
    pub text: String,
}

/// Extracts every `<a href>` from the page, in document order.
///
/// Example:
///   html = `<a href="/fr/about.html">À propos</a>`
///   result = [AnchorRecord { index: 0, href: "/fr/about.html", text: "À propos" }]
pub fn extract_anchors(html: &str) -> Vec<AnchorRecord> {
    let document = Html::parse_document(html);

    // "a[href]" is a constant, so this only fails if scraper itself changes
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let text = element.text().collect::<Vec<_>>().join(" ");
            Some((href.to_string(), text.split_whitespace().collect::<Vec<_>>().join(" ")))
        })
        .enumerate()
        .map(|(index, (href, text))| AnchorRecord { index, href, text })
        .collect()
}
