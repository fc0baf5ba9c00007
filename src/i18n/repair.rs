// src/i18n/repair.rs
// =============================================================================
// Repairs links that point at a missing localized page.
//
// How it works:
// 1. Pick the candidates: same-origin links whose path has a language folder
// 2. Probe each candidate (candidates run concurrently, bounded by the window)
// 3. If it's broken, try the same path in every other language, ONE AT A
//    TIME, in configured order
// 4. Decide: keep it, point it at the first language that exists, or mark it
//    unavailable
//
// This module only decides. Writing the decision into the page (href, title,
// styling) is the page module's job, so everything here can be tested
// without any HTML at all.
// =============================================================================

use crate::config::{Config, LanguageCode, LanguageSet};
use crate::error::{GuardError, Result};
use crate::i18n::path::{detect_language, substitute_language};
use crate::location::PageLocation;
use crate::page::AnchorRecord;
use crate::probe::{map_bounded, Probe};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::{Position, Url};

/// What should happen to one anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RepairDecision {
    /// The link works as it is
    Keep,
    /// The link is broken but exists in another language
    Replace {
        /// Value to write into the href attribute
        href: String,
        /// Absolute URL that was verified
        target: Url,
        language: LanguageCode,
    },
    /// Broken in every language
    Unavailable,
    /// Something went wrong while checking this particular link
    VerificationError { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairOutcome {
    /// Position of the anchor in the document
    pub anchor: usize,
    /// The href attribute as found in the page
    pub original: String,
    #[serde(flatten)]
    pub decision: RepairDecision,
}

impl RepairOutcome {
    /// True when the link needed no attention or was fixed.
    pub fn is_ok(&self) -> bool {
        matches!(self.decision, RepairDecision::Keep | RepairDecision::Replace { .. })
    }
}

/// Checks every candidate anchor and decides what to do with it.
///
/// Outcomes come back in document order, one per candidate (non-candidate
/// anchors are not reported).
///
/// Hrefs that can't be resolved or carry no language segment are filtered
/// out by [`is_candidate`] before any probing, so in practice every outcome
/// here is `Keep`, `Replace` or `Unavailable`. `VerificationError` is what
/// [`repair_anchor`] returns when it is handed such an href directly.
pub async fn repair_links(
    anchors: &[AnchorRecord],
    location: &PageLocation,
    config: &Config,
    probe: &dyn Probe,
) -> Vec<RepairOutcome> {
    let candidates: Vec<&AnchorRecord> = anchors
        .iter()
        .filter(|anchor| is_candidate(&anchor.href, location, &config.languages))
        .collect();

    info!(
        anchors = anchors.len(),
        candidates = candidates.len(),
        "checking localized links"
    );

    map_bounded(candidates, config.concurrency, |anchor| async move {
        RepairOutcome {
            anchor: anchor.index,
            original: anchor.href.clone(),
            decision: repair_anchor(&anchor.href, location, config, probe).await,
        }
    })
    .await
}

/// Decides what to do with one href. Never fails: errors become
/// `VerificationError` so the other anchors carry on.
pub async fn repair_anchor(
    href: &str,
    location: &PageLocation,
    config: &Config,
    probe: &dyn Probe,
) -> RepairDecision {
    match try_repair(href, location, config, probe).await {
        Ok(decision) => decision,
        Err(e) => {
            warn!(href, error = %e, "could not verify link");
            RepairDecision::VerificationError {
                reason: e.to_string(),
            }
        }
    }
}

async fn try_repair(
    href: &str,
    location: &PageLocation,
    config: &Config,
    probe: &dyn Probe,
) -> Result<RepairDecision> {
    let target = location
        .url()
        .join(href)
        .map_err(|e| GuardError::MalformedTarget(href.to_string(), e.to_string()))?;

    let current = detect_language(&target, &config.languages).ok_or_else(|| {
        GuardError::MalformedTarget(href.to_string(), "no language segment".to_string())
    })?;

    if probe.exists(&target).await {
        debug!(href, "link ok");
        return Ok(RepairDecision::Keep);
    }

    // Sequential on purpose: at most one trial per anchor is in flight
    for language in config.languages.others(current) {
        let alternate = substitute_language(&target, current, language)?;
        if probe.exists(&alternate).await {
            info!(href, language = %language, "found link in another language");
            return Ok(RepairDecision::Replace {
                href: replacement_href(href, &alternate),
                target: alternate,
                language: language.clone(),
            });
        }
    }

    info!(href, "link unavailable in every language");
    Ok(RepairDecision::Unavailable)
}

/// Same-origin links into a language folder are candidates. Anchors, mail,
/// phone and script links never are, and neither is anything unparseable.
pub fn is_candidate(href: &str, location: &PageLocation, languages: &LanguageSet) -> bool {
    let lowered = href.trim_start().to_ascii_lowercase();
    if lowered.is_empty()
        || lowered.starts_with('#')
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("javascript:")
    {
        return false;
    }

    match location.url().join(href) {
        Ok(url) => location.is_same_origin(&url) && detect_language(&url, languages).is_some(),
        Err(_) => false,
    }
}

// Absolute hrefs stay absolute; anything else becomes a root-relative path so
// the rewritten page still works when the site is moved to another host.
fn replacement_href(original: &str, alternate: &Url) -> String {
    if Url::parse(original).is_ok() {
        alternate.to_string()
    } else {
        alternate[Position::BeforePath..].to_string()
    }
}
