// src/page/mod.rs
// =============================================================================
// This module is the bridge between the repair logic and a real HTML page.
//
// Submodules:
// - fetch: loads the page (HTTP GET or straight from disk)
// - html: pulls the <a href> elements out of the page
// - rewrite: writes repair decisions, the language switcher and the year
//   back into the HTML
// =============================================================================

mod fetch;
mod html;
mod rewrite;

pub use fetch::load_page;
pub use html::{extract_anchors, AnchorRecord};
pub use rewrite::{insert_switcher, PageRewriter, REPAIR_MARKER};

pub(crate) use rewrite::escape_attr;
