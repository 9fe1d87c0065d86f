//! Webscope main entry point
//!
//! Command-line front end for the page parser and scope engine.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webscope::config::{load_config_with_hash, ParserConfig};
use webscope::http::{build_http_client, fetch_response};
use webscope::parser::{Auditable, Page, Response};
use webscope::scope::Scope;
use webscope::WebscopeError;

/// Webscope: page analysis for web vulnerability scanning
///
/// Extracts links, forms, cookies and headers from a page and decides which
/// discovered URLs fall inside the scan scope.
#[derive(Parser, Debug)]
#[command(name = "webscope")]
#[command(version)]
#[command(about = "Page analysis and scope control for web scanning", long_about = None)]
struct Cli {
    /// Path to TOML scan profile
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a saved response body
    Parse {
        /// File holding the response body
        file: PathBuf,

        /// Effective URL the body was served from
        #[arg(long)]
        url: String,

        /// Declared content type
        #[arg(long, default_value = "text/html")]
        content_type: String,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch a live page and parse it
    Fetch {
        url: String,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the scope decision for candidate URLs
    Scope {
        /// URL of the page the candidates were found on
        current: String,

        /// Candidate URLs
        #[arg(required = true)]
        candidates: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading scan profile from: {}", cli.config.display());
    let (scan, hash) = match load_config_with_hash(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load scan profile: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Scan profile loaded (hash: {})", hash);

    let config = ParserConfig::from_scan_config(&scan)?;

    match cli.command {
        Command::Parse {
            file,
            url,
            content_type,
            json,
        } => handle_parse(&config, file, &url, &content_type, json)?,
        Command::Fetch { url, json } => handle_fetch(&config, &url, json).await?,
        Command::Scope {
            current,
            candidates,
        } => handle_scope(&config, &current, &candidates)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webscope=info,warn"),
            1 => EnvFilter::new("webscope=debug,info"),
            2 => EnvFilter::new("webscope=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles `parse`: builds a page from a body saved on disk
fn handle_parse(
    config: &ParserConfig,
    file: PathBuf,
    url: &str,
    content_type: &str,
    json: bool,
) -> anyhow::Result<()> {
    let body = std::fs::read(&file)?;
    let response = Response::new(url, 200)
        .with_content_type(content_type)
        .with_body(body);

    let page = Page::from_response(&response, config);
    if !webscope::parser::is_text_content(Some(content_type)) {
        tracing::warn!(
            "{}",
            WebscopeError::NonText {
                url: url.to_string(),
                content_type: content_type.to_string(),
            }
        );
    }

    print_page(&page, json)
}

/// Handles `fetch`: fetches a page with the configured cookie jar
async fn handle_fetch(config: &ParserConfig, url: &str, json: bool) -> anyhow::Result<()> {
    let client = build_http_client(&config.user_agent)?;
    let response = fetch_response(&client, url, &config.cookies).await?;

    tracing::info!("Fetched {} ({})", response.url, response.code);
    let page = Page::from_response(&response, config);

    print_page(&page, json)
}

/// Handles `scope`: prints the decision for every candidate
fn handle_scope(config: &ParserConfig, current: &str, candidates: &[String]) -> anyhow::Result<()> {
    let scope = Scope::for_url(config, current)?;

    for candidate in candidates {
        let decision = scope.decide(candidate);
        let verdict = if decision.is_follow() { "FOLLOW" } else { "SKIP" };
        println!("{:<6} {:<14} {}", verdict, decision.to_string(), candidate);
    }

    Ok(())
}

fn print_page(page: &Page, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }

    println!("=== {} ({} {}) ===\n", page.url(), page.method(), page.code());

    println!("Paths ({}):", page.paths().len());
    for path in page.paths() {
        println!("  {}", path);
    }

    println!();
    for element in page.elements() {
        let inputs = element
            .auditable()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  [{}] {} {} {{{}}}",
            element.kind(),
            element.method(),
            element.action(),
            inputs
        );
    }

    println!("\nCookie jar:");
    for (name, value) in page.cookiejar() {
        println!("  {} = {}", name, value);
    }

    Ok(())
}
