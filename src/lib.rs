// src/lib.rs
// =============================================================================
// lang-guardian as a library.
//
// The binary (src/main.rs) is a thin CLI around these modules:
// - config: supported languages, concurrency limit, probe timeout, flags
// - location: the page being inspected and whether it's served or local
// - probe: the existence check and the bounded-concurrency window
// - i18n: localized path building, language discovery and link repair
// - page: loading the HTML and writing decisions back into it
// =============================================================================

pub mod config;
pub mod error;
pub mod i18n;
pub mod location;
pub mod page;
pub mod probe;

pub use config::{Config, LanguageCode, LanguageSet};
pub use error::{GuardError, Result};
pub use location::{ExecutionContext, PageLocation};
