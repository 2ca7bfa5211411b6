//! Session creation against a running driver.
//!
//! Demonstrates:
//! - Building validated session parameters
//! - Creating a session and inspecting the negotiated surface
//! - Executing commands and tolerating missing elements
//! - Deleting the session
//!
//! Start a driver first, e.g. `chromedriver --port=9515`.
//!
//! Usage:
//!   cargo run --example start_session
//!   cargo run --example start_session -- --url http://localhost:4444/wd/hub
//!   cargo run --example start_session -- --browser firefox --debug

// ============================================================================
// Imports
// ============================================================================

use serde_json::json;
use tracing_subscriber::EnvFilter;
use webdriver_remote::{Result, Session, SessionParams};

// ============================================================================
// Constants
// ============================================================================

const DEFAULT_URL: &str = "http://localhost:9515/";
const DEFAULT_BROWSER: &str = "chrome";

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    url: String,
    browser: String,
    debug: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let value_of = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|i| args.get(i + 1))
                .cloned()
        };

        Self {
            url: value_of("--url").unwrap_or_else(|| DEFAULT_URL.to_string()),
            browser: value_of("--browser").unwrap_or_else(|| DEFAULT_BROWSER.to_string()),
            debug: args.iter().any(|a| a == "--debug"),
        }
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        "webdriver_remote=debug"
    } else {
        "webdriver_remote=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<()> {
    println!("=== Start Session ===\n");

    // ========================================================================
    // Create Session
    // ========================================================================

    println!("[1] Connecting to {} ({})...", args.url, args.browser);
    let params = SessionParams::builder()
        .url(&args.url)
        .capability("browserName", json!(args.browser))
        .build()?;

    let session = Session::connect(params).await?;
    let descriptor = session.descriptor();
    println!("    ✓ Session {:?}", descriptor.session_id);
    println!("    ✓ Dialect {:?}", descriptor.flags().dialect);
    println!("    ✓ {} commands available\n", descriptor.surface.len());

    // ========================================================================
    // Commands
    // ========================================================================

    println!("[2] Navigating...");
    session
        .call("navigateTo", vec![json!("https://example.com")])
        .await?;
    let title = session.call("getTitle", vec![]).await?;
    println!("    ✓ Title: {:?}\n", title.into_value());

    println!("[3] Looking up a missing element...");
    let reply = session
        .call("findElement", vec![json!("css selector"), json!("#does-not-exist")])
        .await?;
    println!("    ✓ Element missing: {}\n", reply.is_element_missing());

    // ========================================================================
    // Cleanup
    // ========================================================================

    println!("[4] Deleting session...");
    session.call("deleteSession", vec![]).await?;
    println!("    ✓ State: {}", session.state());

    Ok(())
}
