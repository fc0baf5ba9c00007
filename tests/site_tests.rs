// End-to-end checks against a mocked multilingual site.
//
// Every test spins up a wiremock server that plays the site: pages that
// exist answer 200 to HEAD, everything else falls through to wiremock's
// default 404.

use lang_guardian::i18n::{discover_languages, repair_links, RepairDecision};
use lang_guardian::page::{extract_anchors, insert_switcher, load_page, PageRewriter};
use lang_guardian::probe::HttpProbe;
use lang_guardian::{Config, PageLocation};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

// ==================== Helper Functions ====================

async fn site_with(existing: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    for page in existing {
        Mock::given(method("HEAD"))
            .and(path(*page))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
    }
    server
}

async fn serve_page(server: &MockServer, at: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

fn location(server: &MockServer, at: &str) -> PageLocation {
    PageLocation::parse(&format!("{}{}", server.uri(), at)).unwrap()
}

fn network_probe(config: &Config) -> HttpProbe {
    HttpProbe::new(config, lang_guardian::ExecutionContext::Network).unwrap()
}

// ==================== Language discovery ====================

#[tokio::test]
async fn test_all_three_languages_found_with_fr_active() {
    let server = site_with(&["/en/about.html", "/fr/about.html", "/gk/about.html"]).await;
    let config = Config::default();

    let menu = discover_languages(&location(&server, "/fr/about.html"), &config, &network_probe(&config)).await;

    let codes: Vec<_> = menu.options.iter().map(|o| o.code.as_str()).collect();
    assert_eq!(codes, vec!["en", "fr", "gk"]);
    assert_eq!(menu.active().map(|o| o.code.as_str()), Some("fr"));
    assert_eq!(menu.options[0].href.path(), "/en/about.html");
    assert!(menu.is_worth_showing());
}

#[tokio::test]
async fn test_single_language_suppresses_switcher() {
    let server = site_with(&["/fr/about.html"]).await;
    let config = Config::default();

    let menu = discover_languages(&location(&server, "/fr/about.html"), &config, &network_probe(&config)).await;

    assert_eq!(menu.options.len(), 1);
    assert!(!menu.is_worth_showing());
    assert!(menu.render_html(&config).is_none());
}

#[tokio::test]
async fn test_slow_language_counts_as_missing() {
    let server = site_with(&["/en/about.html", "/fr/about.html"]).await;
    Mock::given(method("HEAD"))
        .and(path("/gk/about.html"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    let config = Config::default().with_probe_timeout(Duration::from_millis(200));

    let menu = discover_languages(&location(&server, "/fr/about.html"), &config, &network_probe(&config)).await;

    let codes: Vec<_> = menu.options.iter().map(|o| o.code.as_str()).collect();
    assert_eq!(codes, vec!["en", "fr"]);
}

// ==================== Link repair ====================

#[tokio::test]
async fn test_broken_link_is_moved_to_english() {
    let server = site_with(&["/en/missing.html"]).await;
    let config = Config::default();
    let anchors = extract_anchors(r#"<a href="/fr/missing.html">Missing</a>"#);

    let outcomes = repair_links(&anchors, &location(&server, "/fr/index.html"), &config, &network_probe(&config)).await;

    assert_eq!(outcomes.len(), 1);
    match &outcomes[0].decision {
        RepairDecision::Replace { href, language, .. } => {
            assert_eq!(href, "/en/missing.html");
            assert_eq!(language.as_str(), "en");
        }
        other => panic!("expected a replacement, got {:?}", other),
    }
}

#[tokio::test]
async fn test_link_missing_everywhere_is_unavailable() {
    let server = site_with(&[]).await;
    let config = Config::default();
    let anchors = extract_anchors(r#"<a href="/fr/missing.html">Missing</a>"#);

    let outcomes = repair_links(&anchors, &location(&server, "/fr/index.html"), &config, &network_probe(&config)).await;

    assert_eq!(outcomes[0].decision, RepairDecision::Unavailable);
    assert_eq!(outcomes[0].original, "/fr/missing.html");
}

// ==================== Whole page ====================

#[tokio::test]
async fn test_page_is_rewritten_end_to_end() {
    let html = r#"<html><body>
<nav><a href="/fr/index.html">Accueil</a> <a href="/fr/missing.html">Projet</a> <a href="/fr/gone.html">Ancien</a></nav>
<a href="https://example.org/fr/elsewhere.html">Ailleurs</a> <a href="mailto:hi@example.com">Mail</a>
<footer><span id="year">2000</span></footer>
</body></html>"#;

    let server = site_with(&["/fr/index.html", "/en/index.html", "/en/missing.html"]).await;
    serve_page(&server, "/fr/index.html", html).await;

    let config = Config::default();
    let probe = network_probe(&config);
    let page = location(&server, "/fr/index.html");

    let source = load_page(&page, &config).await.unwrap();
    let menu = discover_languages(&page, &config, &probe).await;
    let outcomes = repair_links(&extract_anchors(&source), &page, &config, &probe).await;

    // only the three same-origin localized links are checked
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].decision, RepairDecision::Keep);
    assert!(matches!(outcomes[1].decision, RepairDecision::Replace { .. }));
    assert_eq!(outcomes[2].decision, RepairDecision::Unavailable);

    let rewriter = PageRewriter::new().unwrap();
    let mut repaired = rewriter.apply_repairs(&source, &outcomes);
    repaired = insert_switcher(&repaired, &menu.render_html(&config).unwrap());
    repaired = rewriter.stamp_year(&repaired, 2026);

    assert!(repaired.contains(r#"<a href="/fr/index.html">Accueil</a>"#));
    assert!(repaired.contains(r#"href="/en/missing.html" title="Version found in another language: en""#));
    assert!(repaired.contains(r#"<a href="/fr/gone.html" title="Link unavailable in every language" style="color: red""#));
    assert!(repaired.contains(r#"<a href="https://example.org/fr/elsewhere.html">Ailleurs</a>"#));
    assert!(repaired.contains(r#"<span id="year">2026</span>"#));

    let switcher_at = repaired.find("lang-switcher").unwrap();
    assert!(switcher_at < repaired.find("</body>").unwrap());
    assert!(repaired.contains("lang-btn active"));
}

#[tokio::test]
async fn test_every_reported_decision_lands_in_the_page() {
    let html = r#"<body><a href="/fr/gone&#46;html">x</a> <a title="see href=x" href="/fr/old.html">y</a></body>"#;
    let server = site_with(&[]).await;
    let config = Config::default();
    let page = location(&server, "/fr/index.html");

    let outcomes = repair_links(&extract_anchors(html), &page, &config, &network_probe(&config)).await;
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.decision == RepairDecision::Unavailable));

    let repaired = PageRewriter::new().unwrap().apply_repairs(html, &outcomes);
    assert_eq!(repaired.matches(r#"data-lang-repair="unavailable""#).count(), 2);
    assert!(repaired.contains(r#"<a href="/fr/gone&#46;html" title="Link unavailable in every language""#));
    assert!(repaired.contains(r#"<a title="Link unavailable in every language" href="/fr/old.html" style="color: red""#));
}

#[tokio::test]
async fn test_local_page_trusts_every_language() {
    let dir = tempfile::tempdir().unwrap();
    let fr = dir.path().join("fr");
    std::fs::create_dir_all(&fr).unwrap();
    let file = fr.join("index.html");
    std::fs::write(&file, r#"<a href="../en/index.html">EN</a><a href="about.html">À propos</a>"#).unwrap();

    let page = PageLocation::from_path(&file).unwrap();
    assert!(page.is_local());

    let config = Config::default();
    let probe = HttpProbe::new(&config, page.context()).unwrap();

    let menu = discover_languages(&page, &config, &probe).await;
    assert_eq!(menu.options.len(), 3);
    assert_eq!(menu.active().map(|o| o.code.as_str()), Some("fr"));

    let source = load_page(&page, &config).await.unwrap();
    let outcomes = repair_links(&extract_anchors(&source), &page, &config, &probe).await;
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.decision == RepairDecision::Keep));
}
