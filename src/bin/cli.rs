//! Scenario runner
//!
//! Launches a browser, runs the selected scenario against the configured
//! storefront and exits non-zero on failure. Configuration comes from CLI
//! flags plus an optional JSON file; `RUST_LOG` controls verbosity.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use storefront_e2e::flow::{self, FlowConfig};
use storefront_e2e::{BrowserSession, LaunchOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Full search, product and quick-look journey
    Search,
    /// Smoke test: search and await the result list
    BasicSearch,
}

#[derive(Debug, Parser)]
#[command(name = "storefront-e2e", version, about = "End-to-end storefront UI regression runner")]
struct Args {
    /// Scenario to run
    #[arg(long, value_enum, default_value = "search")]
    scenario: Scenario,

    /// Launch the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// JSON file overriding the default scenario configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storefront entry URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Directory for diagnostic screenshots (overrides the config file)
    #[arg(long)]
    screenshot_dir: Option<String>,

    /// Browser window size as WIDTHxHEIGHT
    #[arg(long, default_value = "1920x1080")]
    window_size: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => FlowConfig::from_json_file(path)?,
        None => FlowConfig::default(),
    };
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(dir) = args.screenshot_dir {
        config.screenshot_dir = dir;
    }

    let (width, height) = parse_window_size(&args.window_size)?;

    let session = BrowserSession::launch(
        LaunchOptions::new().headless(!args.headed).window_size(width, height),
    )?;

    let result = match args.scenario {
        Scenario::Search => flow::run_search_flow(&session, &config),
        Scenario::BasicSearch => flow::run_basic_search(&session, &config),
    };

    if let Err(e) = session.close() {
        log::warn!("Browser shutdown failed: {}", e);
    }

    result?;
    Ok(())
}

fn parse_window_size(raw: &str) -> anyhow::Result<(u32, u32)> {
    let (w, h) = raw
        .split_once('x')
        .ok_or_else(|| anyhow::anyhow!("window size must be WIDTHxHEIGHT, got '{}'", raw))?;
    Ok((w.trim().parse()?, h.trim().parse()?))
}
