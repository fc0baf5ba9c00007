// src/i18n/mod.rs
// =============================================================================
// Everything that knows about the site's language folders.
//
// Submodules:
// - path: builds the URL of a page in another language
// - discover: which language versions of the current page exist
// - repair: what to do with links that point at a missing localized page
// =============================================================================

mod discover;
mod path;
mod repair;

pub use discover::{discover_languages, LanguageMenu, LanguageOption};
pub use path::{build_localized_href, detect_language, substitute_language};
pub use repair::{is_candidate, repair_anchor, repair_links, RepairDecision, RepairOutcome};
