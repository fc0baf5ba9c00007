// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every subcommand takes the same probing options (ProbeArgs), flattened in
// with #[command(flatten)] so they're only written down once.
// =============================================================================

use clap::{ArgAction, Args, Parser, Subcommand};
use lang_guardian::config::{DEFAULT_CONCURRENCY, DEFAULT_INDEX_PAGE};
use lang_guardian::{Config, LanguageSet};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "lang-guardian",
    version = "0.1.0",
    about = "Find the language versions of a static site page and repair broken localized links",
    long_about = "lang-guardian looks at one page of a multilingual static site (served over HTTP or opened \
                  from disk). It checks which language versions of the page exist, probes every link that \
                  points into a language folder, and redirects broken ones to a language that has the page."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More logging on stderr (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the language versions of a page that actually exist
    ///
    /// Example: lang-guardian languages https://example.com/fr/about.html
    Languages(ProbeArgs),

    /// Check the page's localized links and suggest repairs
    ///
    /// Example: lang-guardian links https://example.com/fr/index.html --json
    Links(ProbeArgs),

    /// Do both, and optionally write the repaired page
    ///
    /// Example: lang-guardian page ./site/fr/index.html --output fixed.html
    Page {
        #[command(flatten)]
        probe: ProbeArgs,

        /// Write the page with repaired links and the language switcher here
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Page to inspect: an http(s):// URL, a file:// URL or a path on disk
    pub location: String,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Maximum number of probes in flight at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-probe timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Timeout for loading the page itself, in milliseconds
    #[arg(long, default_value_t = 10000)]
    pub page_timeout_ms: u64,

    /// Supported languages, comma-separated, in fallback order
    #[arg(long, default_value = "en,fr,gk")]
    pub languages: LanguageSet,

    /// Page name used when a localized URL has to point at a folder
    #[arg(long, default_value = DEFAULT_INDEX_PAGE)]
    pub index_page: String,
}

impl ProbeArgs {
    /// Turns the flags into the startup configuration.
    ///
    /// Flag icons come from the defaults; languages without one get a badge.
    pub fn config(&self) -> Config {
        Config::default()
            .with_languages(self.languages.clone())
            .with_concurrency(self.concurrency)
            .with_probe_timeout(Duration::from_millis(self.timeout_ms))
            .with_page_timeout(Duration::from_millis(self.page_timeout_ms))
            .with_index_page(self.index_page.clone())
    }
}
