//! # storefront-e2e
//!
//! An end-to-end UI regression suite for an e-commerce storefront, driven
//! over the Chrome DevTools Protocol (CDP).
//!
//! ## Features
//!
//! - **Browser Session Management**: Launch or connect to Chrome/Chromium instances
//! - **Page Abstractions**: Home and product page objects that encapsulate selectors,
//!   waits and the multi-tier fallback behavior of the storefront UI
//! - **Probe Semantics**: Observations return `Found`/`NotFound`/`Unknown` instead of
//!   collapsing driver failures into "absent"
//! - **Scenario Orchestration**: Linear journeys with per-step logging and failure
//!   screenshots, runnable from the bundled CLI
//!
//! ## Running the suite
//!
//! ```bash
//! # Full journey, headless
//! cargo run -- --scenario search
//!
//! # Smoke search with a visible browser and a staging config
//! cargo run -- --scenario basic-search --headed --config staging.json
//! ```
//!
//! ## Library Usage
//!
//! ### Driving a journey directly
//!
//! ```rust,no_run
//! use storefront_e2e::{BrowserSession, LaunchOptions};
//! use storefront_e2e::flow::{self, FlowConfig};
//!
//! # fn main() -> storefront_e2e::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! flow::run_search_flow(&session, &FlowConfig::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Using the page abstractions
//!
//! ```rust,no_run
//! use storefront_e2e::{BrowserSession, HomePage, LaunchOptions};
//!
//! # fn main() -> storefront_e2e::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! let tab = session.first_tab()?;
//! session.navigate(&tab, "https://www.example-store.test")?;
//!
//! let home = HomePage::new(&session, tab);
//! home.base().wait_for_page_load()?;
//! home.search_product("wireless headphones")?;
//! let suggestions = home.search_suggestions();
//! println!("{} suggestions rendered", suggestions.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Browser session management and configuration
//! - [`pages`]: Page abstractions, probe results and text-matching rules
//! - [`flow`]: Scenario orchestration and configuration
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod error;
pub mod flow;
pub mod pages;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use error::{Result, SuiteError};
pub use flow::FlowConfig;
pub use pages::{BasePage, HomePage, MatchTier, Probe, ProductPage};
