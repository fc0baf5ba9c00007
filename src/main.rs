// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so --json output on stdout stays clean)
// 3. Load the page, then run language discovery and/or link repair
// 4. Print the results and exit with a proper code
//    (0 = all good, 1 = problems found, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use cli::{Cli, Commands, ProbeArgs};
use lang_guardian::i18n::{discover_languages, repair_links, LanguageMenu, RepairDecision, RepairOutcome};
use lang_guardian::page::{extract_anchors, insert_switcher, load_page, PageRewriter};
use lang_guardian::probe::HttpProbe;
use lang_guardian::{Config, ExecutionContext, PageLocation};
use serde::Serialize;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lang_guardian={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Languages(args) => handle_languages(&args).await,
        Commands::Links(args) => handle_links(&args).await,
        Commands::Page { probe, output } => handle_page(&probe, output.as_deref()).await,
    }
}

/// Everything a pass needs, built once from the flags.
struct Session {
    location: PageLocation,
    config: Config,
    probe: HttpProbe,
}

fn prepare(args: &ProbeArgs) -> Result<Session> {
    let location = PageLocation::parse(&args.location)?;
    let config = args.config();
    config.validate()?;
    let probe = HttpProbe::new(&config, location.context())?;

    if location.is_local() {
        info!("page opened from disk: probes assume every target exists");
    }

    Ok(Session {
        location,
        config,
        probe,
    })
}

// Handles the 'languages' subcommand
// Exit code 1 means the switcher would be hidden (fewer than 2 versions)
async fn handle_languages(args: &ProbeArgs) -> Result<i32> {
    let session = prepare(args)?;
    let menu = discover_languages(&session.location, &session.config, &session.probe).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&menu)?);
    } else {
        print_menu(&menu);
    }

    Ok(if menu.is_worth_showing() { 0 } else { 1 })
}

// Handles the 'links' subcommand
async fn handle_links(args: &ProbeArgs) -> Result<i32> {
    let session = prepare(args)?;
    let html = load_page(&session.location, &session.config).await?;
    let anchors = extract_anchors(&html);
    let outcomes = repair_links(&anchors, &session.location, &session.config, &session.probe).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        print_repairs(&outcomes);
    }

    Ok(exit_code_for(&outcomes))
}

#[derive(Serialize)]
struct PageReport<'a> {
    page: &'a str,
    context: ExecutionContext,
    switcher_shown: bool,
    languages: &'a LanguageMenu,
    links: &'a [RepairOutcome],
}

// Handles the 'page' subcommand: discovery, then repair, then (optionally)
// the rewritten page
async fn handle_page(args: &ProbeArgs, output: Option<&Path>) -> Result<i32> {
    let session = prepare(args)?;
    let html = load_page(&session.location, &session.config).await?;

    let menu = discover_languages(&session.location, &session.config, &session.probe).await;
    let anchors = extract_anchors(&html);
    let outcomes = repair_links(&anchors, &session.location, &session.config, &session.probe).await;

    if args.json {
        let report = PageReport {
            page: session.location.url().as_str(),
            context: session.location.context(),
            switcher_shown: menu.is_worth_showing(),
            languages: &menu,
            links: &outcomes,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_menu(&menu);
        println!();
        print_repairs(&outcomes);
    }

    if let Some(path) = output {
        let rewriter = PageRewriter::new()?;
        let mut repaired = rewriter.apply_repairs(&html, &outcomes);
        if let Some(switcher) = menu.render_html(&session.config) {
            repaired = insert_switcher(&repaired, &switcher);
        }
        repaired = rewriter.stamp_year(&repaired, chrono::Local::now().year());

        tokio::fs::write(path, repaired)
            .await
            .with_context(|| format!("could not write {}", path.display()))?;
        info!(path = %path.display(), "wrote repaired page");
    }

    Ok(exit_code_for(&outcomes))
}

fn exit_code_for(outcomes: &[RepairOutcome]) -> i32 {
    if outcomes.iter().all(RepairOutcome::is_ok) {
        0
    } else {
        1
    }
}

fn print_menu(menu: &LanguageMenu) {
    println!("{:<8} {:<8} {:<60}", "LANG", "ACTIVE", "URL");
    println!("{}", "=".repeat(76));

    for option in &menu.options {
        let active = if option.active { "✅" } else { "" };
        println!("{:<8} {:<8} {:<60}", option.code, active, option.href.as_str());
    }

    println!();
    if menu.is_worth_showing() {
        println!("🌐 {} language version(s) found, switcher shown", menu.options.len());
    } else {
        println!("⚠️  {} language version(s) found, switcher hidden", menu.options.len());
    }
}

fn print_repairs(outcomes: &[RepairOutcome]) {
    println!("{:<50} {:<15} {:<40}", "LINK", "STATUS", "DETAIL");
    println!("{}", "=".repeat(105));

    for outcome in outcomes {
        // Truncate long links so the table stays readable
        let link = if outcome.original.chars().count() > 47 {
            format!("{}...", outcome.original.chars().take(47).collect::<String>())
        } else {
            outcome.original.clone()
        };

        let (status, detail) = match &outcome.decision {
            RepairDecision::Keep => ("✅ OK".to_string(), String::new()),
            RepairDecision::Replace { href, language, .. } => {
                ("🔀 REPAIRED".to_string(), format!("{} ({})", href, language))
            }
            RepairDecision::Unavailable => ("❌ UNAVAILABLE".to_string(), String::new()),
            RepairDecision::VerificationError { reason } => ("⚠️  ERROR".to_string(), reason.clone()),
        };

        println!("{:<50} {:<15} {:<40}", link, status, detail);
    }

    println!();

    let count = |wanted: fn(&RepairDecision) -> bool| outcomes.iter().filter(|o| wanted(&o.decision)).count();

    println!("📊 Summary:");
    println!("   ✅ OK: {}", count(|d| matches!(d, RepairDecision::Keep)));
    println!("   🔀 Repaired: {}", count(|d| matches!(d, RepairDecision::Replace { .. })));
    println!("   ❌ Unavailable: {}", count(|d| matches!(d, RepairDecision::Unavailable)));
    println!("   ⚠️  Errors: {}", count(|d| matches!(d, RepairDecision::VerificationError { .. })));
    println!("   📋 Total: {}", outcomes.len());
}
