//! Browser session management
//!
//! Wraps a Chrome/Chromium instance driven over the DevTools Protocol:
//! - `LaunchOptions` / `ConnectionOptions`: how the instance is obtained
//! - `BrowserSession`: tab enumeration, navigation and element lookup

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;
