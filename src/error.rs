// src/error.rs
// =============================================================================
// Error types for the library side of lang-guardian.
//
// Most failures in this tool are NOT errors: an unreachable link is a normal
// answer (false), and a link that can't be repaired is a report line. What's
// left here are the things that stop a pass from starting (bad location, bad
// configuration, page that can't be loaded) plus MalformedTarget, which the
// repairer catches per anchor.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("Invalid page location '{0}': {1}")]
    InvalidLocation(String, String),

    #[error("Invalid language code '{0}': {1}")]
    InvalidLanguage(String, String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed link target '{0}': {1}")]
    MalformedTarget(String, String),

    #[error("Could not load page {0}: {1}")]
    PageLoad(String, String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GuardError>;
