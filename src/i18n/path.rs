// src/i18n/path.rs
// =============================================================================
// Builds the URL of the same page in another language.
//
// The site keeps each language in its own folder:
//
//   /fr/about.html  <->  /en/about.html  <->  /gk/about.html
//
// So "the English version" of a page is the same path with the language
// segment swapped. When the path has no language segment yet, we guess where
// one belongs:
//
//   network page                           local (file://) page
//   /               -> /en/index.html      /site/about.html -> /site/en/about.html
//   /about.html     -> /en/about.html      /site/           -> /site/en/
//   /docs           -> /docs/en/index.html
//
// A segment only counts when it IS the language code, so /frost is never
// mistaken for fr. Query strings and fragments are carried through untouched.
// =============================================================================

use crate::config::{Config, LanguageCode, LanguageSet};
use crate::error::{GuardError, Result};
use crate::location::PageLocation;
use url::Url;

/// Returns the first path segment that is one of the supported languages.
pub fn detect_language<'a>(url: &Url, languages: &'a LanguageSet) -> Option<&'a LanguageCode> {
    url.path_segments()?.find_map(|segment| languages.find(segment))
}

/// Computes the URL of the current page in `language`.
pub fn build_localized_href(location: &PageLocation, language: &LanguageCode, config: &Config) -> Url {
    let mut target = location.url().clone();

    if let Some(current) = detect_language(location.url(), &config.languages) {
        if let Some(path) = replace_segment(target.path(), current.as_str(), language.as_str()) {
            target.set_path(&path);
        }
        return target;
    }

    let path = if location.is_local() {
        insert_before_last_component(target.path(), language)
    } else {
        insert_into_site_path(target.path(), language, &config.index_page)
    };
    target.set_path(&path);
    target
}

/// Swaps the first `from` segment of `url` for `to`, leaving everything else
/// (other segments, trailing slash, query, fragment) as it was.
pub fn substitute_language(url: &Url, from: &LanguageCode, to: &LanguageCode) -> Result<Url> {
    if url.cannot_be_a_base() {
        return Err(GuardError::MalformedTarget(
            url.to_string(),
            "URL has no path".to_string(),
        ));
    }

    let path = replace_segment(url.path(), from.as_str(), to.as_str()).ok_or_else(|| {
        GuardError::MalformedTarget(
            url.to_string(),
            format!("path has no '{}' segment", from),
        )
    })?;

    let mut target = url.clone();
    target.set_path(&path);
    Ok(target)
}

// Splitting on '/' without dropping empty pieces keeps the exact shape of the
// path, and comparing whole pieces is what makes the match boundary-aware.
fn replace_segment(path: &str, from: &str, to: &str) -> Option<String> {
    let mut replaced = false;
    let segments: Vec<&str> = path
        .split('/')
        .map(|segment| {
            if !replaced && segment == from {
                replaced = true;
                to
            } else {
                segment
            }
        })
        .collect();

    replaced.then(|| segments.join("/"))
}

fn insert_into_site_path(path: &str, language: &LanguageCode, index_page: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.last() {
        // Looks like a file: put the language folder just in front of it
        Some(last) if last.contains('.') => {
            let at = segments.len() - 1;
            segments.insert(at, language.as_str());
        }
        // Root or a folder: point at the folder's index page
        _ => {
            segments.push(language.as_str());
            segments.push(index_page);
        }
    }

    format!("/{}", segments.join("/"))
}

fn insert_before_last_component(path: &str, language: &LanguageCode) -> String {
    match path.rfind('/') {
        Some(at) => format!("{}/{}{}", &path[..at], language, &path[at..]),
        None => format!("/{}/{}", language, path),
    }
}
