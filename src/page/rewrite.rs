// src/page/rewrite.rs
// =============================================================================
// Writes repair decisions back into the page HTML.
//
// The repair pass works on AnchorRecords; this is the thin layer that turns
// its decisions into attribute changes on the real <a> tags:
//
//   replaced     -> new href, title naming the language found
//   unavailable  -> red, title saying no language has the page
//   error        -> gray, title saying the check itself failed
//
// Tags are found with regexes rather than re-serializing a parsed DOM, so
// everything we don't touch (formatting, comments, inline scripts) comes
// out byte for byte the way it went in.
//
// Inside a tag, attributes are read one after another from the tag name on,
// so `href=` written inside another attribute's quoted value is never taken
// for the href itself. The href value is decoded by scraper, the same parser
// that produced the AnchorRecords, so both sides agree on what it says.
// =============================================================================

use crate::error::{GuardError, Result};
use crate::i18n::{RepairDecision, RepairOutcome};
use regex::{Captures, Regex};
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::ops::Range;

// An <a ...> start tag; quoted attribute values may contain '>'
const ANCHOR_TAG: &str = r#"(?i)<a\b(?:[^>"']|"[^"]*"|'[^']*')*>"#;

// One attribute at the very start of the remaining tag text
const ATTRIBUTE: &str = r#"^\s+([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#;

// Start tag of the element with id="year"; group 1 is the tag name.
// A bare value must end right there, so id=year-old is someone else.
const YEAR_ELEMENT: &str = r#"(?i)<([a-z][a-z0-9]*)\b(?:[^>"']|"[^"]*"|'[^']*')*?\sid\s*=\s*(?:"year"(?:[^>"']|"[^"]*"|'[^']*')*>|'year'(?:[^>"']|"[^"]*"|'[^']*')*>|year(?:\s(?:[^>"']|"[^"]*"|'[^']*')*)?>)"#;

// Any start or end tag; group 1 is "/" for end tags, group 2 the name
const ANY_TAG: &str = r#"(?i)<(/?)([a-z][a-z0-9]*)\b(?:[^>"']|"[^"]*"|'[^']*')*>"#;

/// Marker attribute telling stylesheets (and people) what happened to a link.
pub const REPAIR_MARKER: &str = "data-lang-repair";

/// One attribute of a start tag, located by byte range within the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Attribute {
    name: String,
    value: Option<String>,
    span: Range<usize>,
}

pub struct PageRewriter {
    anchor_tag: Regex,
    attribute: Regex,
    year: Regex,
    any_tag: Regex,
    anchor: Selector,
}

impl PageRewriter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            anchor_tag: Regex::new(ANCHOR_TAG)?,
            attribute: Regex::new(ATTRIBUTE)?,
            year: Regex::new(YEAR_ELEMENT)?,
            any_tag: Regex::new(ANY_TAG)?,
            anchor: Selector::parse("a[href]")
                .map_err(|e| GuardError::InvalidConfig(format!("bad selector: {:?}", e)))?,
        })
    }

    /// Applies every non-`Keep` decision to the anchors carrying that href.
    pub fn apply_repairs(&self, html: &str, outcomes: &[RepairOutcome]) -> String {
        let decisions: HashMap<&str, &RepairDecision> = outcomes
            .iter()
            .filter(|outcome| outcome.decision != RepairDecision::Keep)
            .map(|outcome| (outcome.original.as_str(), &outcome.decision))
            .collect();

        if decisions.is_empty() {
            return html.to_string();
        }

        self.anchor_tag
            .replace_all(html, |caps: &Captures| {
                let tag = &caps[0];
                let decision = self
                    .decoded_href(tag)
                    .and_then(|href| decisions.get(href.as_str()).copied());

                match decision {
                    Some(decision) => self.annotate(tag, decision),
                    None => tag.to_string(),
                }
            })
            .into_owned()
    }

    /// Replaces the content of the `id="year"` element, if the page has one.
    ///
    /// Like setting `textContent`, any markup nested in the element goes too.
    pub fn stamp_year(&self, html: &str, year: i32) -> String {
        let Some(caps) = self.year.captures(html) else {
            return html.to_string();
        };
        let (Some(start_tag), Some(name)) = (caps.get(0), caps.get(1)) else {
            return html.to_string();
        };
        if start_tag.as_str().ends_with("/>") {
            return html.to_string();
        }

        // Find the matching end tag, skipping nested elements of the same name
        let mut depth = 0usize;
        for tag in self.any_tag.captures_iter(&html[start_tag.end()..]) {
            if !tag[2].eq_ignore_ascii_case(name.as_str()) || tag[0].ends_with("/>") {
                continue;
            }
            if tag[1].is_empty() {
                depth += 1;
            } else if depth > 0 {
                depth -= 1;
            } else if let Some(end_tag) = tag.get(0) {
                let body_end = start_tag.end() + end_tag.start();
                return format!("{}{}{}", &html[..start_tag.end()], year, &html[body_end..]);
            }
        }

        html.to_string()
    }

    // The href exactly as the extraction pass saw it: html5ever's attribute
    // parsing (first occurrence wins) and its full entity decoding
    fn decoded_href(&self, tag: &str) -> Option<String> {
        let fragment = Html::parse_fragment(tag);
        let element = fragment.select(&self.anchor).next()?;
        element.value().attr("href").map(str::to_string)
    }

    fn annotate(&self, tag: &str, decision: &RepairDecision) -> String {
        match decision {
            RepairDecision::Keep => tag.to_string(),
            RepairDecision::Replace { href, language, .. } => {
                let tag = self.set_attr(tag, "href", href);
                let tag = self.set_attr(
                    &tag,
                    "title",
                    &format!("Version found in another language: {}", language),
                );
                self.set_attr(&tag, REPAIR_MARKER, "replaced")
            }
            RepairDecision::Unavailable => {
                let tag = self.set_attr(tag, "title", "Link unavailable in every language");
                let tag = self.add_color(&tag, "red");
                self.set_attr(&tag, REPAIR_MARKER, "unavailable")
            }
            RepairDecision::VerificationError { .. } => {
                let tag = self.set_attr(tag, "title", "Error while verifying link");
                let tag = self.add_color(&tag, "gray");
                self.set_attr(&tag, REPAIR_MARKER, "error")
            }
        }
    }

    // Keeps whatever inline style the link already had
    fn add_color(&self, tag: &str, color: &str) -> String {
        let existing = self.find_attr(tag, "style").and_then(|attr| attr.value);
        let style = match existing {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{}; color: {}", existing.trim().trim_end_matches(';'), color)
            }
            _ => format!("color: {}", color),
        };
        self.set_attr(tag, "style", &style)
    }

    /// Walks the attributes of a start tag in order, from the tag name on.
    fn attributes(&self, tag: &str) -> Vec<Attribute> {
        let name_end = tag
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_whitespace() || *c == '/' || *c == '>')
            .map(|(at, _)| at)
            .unwrap_or(tag.len());

        let mut found = Vec::new();
        let mut at = name_end;
        while let Some(caps) = self.attribute.captures(&tag[at..]) {
            let Some(whole) = caps.get(0) else { break };
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string());
            found.push(Attribute {
                name: caps[1].to_ascii_lowercase(),
                value,
                span: at + whole.start()..at + whole.end(),
            });
            at += whole.end();
        }
        found
    }

    // First occurrence wins, as in the HTML parser
    fn find_attr(&self, tag: &str, name: &str) -> Option<Attribute> {
        self.attributes(tag)
            .into_iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    fn set_attr(&self, tag: &str, name: &str, value: &str) -> String {
        let attr = format!(" {}=\"{}\"", name, escape_attr(value));

        if let Some(existing) = self.find_attr(tag, name) {
            return format!("{}{}{}", &tag[..existing.span.start], attr, &tag[existing.span.end..]);
        }

        let end = if tag.ends_with("/>") { tag.len() - 2 } else { tag.len() - 1 };
        format!("{}{}{}", &tag[..end], attr, &tag[end..])
    }
}

/// Inserts the language switcher just before `</body>`, or at the end of
/// the document when there is no body end tag.
pub fn insert_switcher(html: &str, switcher: &str) -> String {
    // ASCII lowercasing keeps byte offsets identical
    match html.to_ascii_lowercase().rfind("</body>") {
        Some(at) => format!("{}{}\n{}", &html[..at], switcher, &html[at..]),
        None => format!("{}\n{}", html, switcher),
    }
}

pub(crate) fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
