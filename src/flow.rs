//! Scenario orchestration
//!
//! Sequences the page abstractions into linear end-to-end journeys. Each
//! step is a blocking call; a failed step takes a diagnostic screenshot and
//! propagates, failing the run. Retrying a whole scenario is the caller's
//! concern, not handled here.

use crate::browser::BrowserSession;
use crate::error::{Result, SuiteError};
use crate::pages::{matching, HomePage, Probe, ProductPage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the scenarios are parameterized over.
///
/// Defaults describe the reference storefront journey; a JSON file can
/// override any subset of fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Storefront entry URL
    pub base_url: String,

    /// Search-dropdown category label to select
    pub category: String,

    /// Broad search term whose suggestions are validated
    pub search_term: String,

    /// Refined term typed before selecting a suggestion
    pub refined_search_term: String,

    /// Suggestion entry to select from the panel
    pub suggestion: String,

    /// Keywords a result title must all contain to be clicked
    pub result_keywords: Vec<String>,

    /// Token the product page URL must contain
    pub product_url_token: String,

    /// Label of the navigation menu holding the variants
    pub store_menu_label: String,

    /// Variant entry to select from the menu
    pub variant: String,

    /// Product name the quick-look modal must mention
    pub expected_modal_product: String,

    /// Directory diagnostic screenshots are written to
    pub screenshot_dir: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.amazon.in".to_string(),
            category: "Electronics".to_string(),
            search_term: "iPhone 13".to_string(),
            refined_search_term: "iPhone 13 128 GB".to_string(),
            suggestion: "iPhone 13 128GB".to_string(),
            result_keywords: vec!["iPhone 13".to_string(), "128".to_string()],
            product_url_token: "iPhone-13".to_string(),
            store_menu_label: "Apple Watch".to_string(),
            variant: "Apple Watch SE (GPS + Cellular)".to_string(),
            expected_modal_product: "Apple Watch SE".to_string(),
            screenshot_dir: "screenshots".to_string(),
        }
    }
}

impl FlowConfig {
    /// Load a config from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&raw)
            .map_err(|e| SuiteError::Config(format!("{}: {}", path.as_ref().display(), e)))
    }
}

/// The full search-and-navigate journey: category search, suggestion
/// validation and selection, result click into a new tab, brand store,
/// variant selection, quick-look modal validation.
///
/// On failure a `failure` screenshot is taken before the error propagates.
pub fn run_search_flow(session: &BrowserSession, config: &FlowConfig) -> Result<()> {
    let result = search_flow_steps(session, config);

    if let Err(ref err) = result {
        log::error!("Search flow failed: {}", err);
        if let Ok(tab) = session.latest_tab() {
            crate::pages::BasePage::new(session, tab)
                .with_screenshot_dir(&config.screenshot_dir)
                .take_screenshot("failure");
        }
    }

    result
}

fn search_flow_steps(session: &BrowserSession, config: &FlowConfig) -> Result<()> {
    let tab = session.first_tab()?;
    let home = HomePage::new(session, tab.clone()).with_screenshot_dir(&config.screenshot_dir);

    log::info!("Navigating to {}", config.base_url);
    session.navigate(&tab, &config.base_url)?;
    home.base().wait_for_page_load()?;
    home.base().take_screenshot("homepage-loaded");

    log::info!("Searching for '{}' in category '{}'", config.search_term, config.category);
    home.select_category(&config.category)?;
    home.search_product(&config.search_term)?;
    home.base().take_screenshot("search-initiated");

    log::info!("Validating search suggestions");
    let suggestions = home.search_suggestions();
    if suggestions.is_empty() {
        return Err(SuiteError::step("validate search suggestions", "no suggestions rendered"));
    }
    if !matching::all_contain(&suggestions, &config.search_term) {
        return Err(SuiteError::step(
            "validate search suggestions",
            format!("not every suggestion mentions '{}': {:?}", config.search_term, suggestions),
        ));
    }
    home.base().take_screenshot("search-suggestions");

    log::info!("Refining search to '{}'", config.refined_search_term);
    home.search_product(&config.refined_search_term)?;
    home.select_search_suggestion(&config.suggestion)?;

    let tabs_before = session.tab_count()?;
    let product_tab = home.click_first_search_result(&config.result_keywords)?;

    if !home.new_tab_opened(tabs_before)? {
        return Err(SuiteError::step("open product page", "result click opened no new tab"));
    }
    let url = product_tab.get_url();
    if !url.contains(&config.product_url_token) {
        return Err(SuiteError::step(
            "open product page",
            format!("URL '{}' does not contain '{}'", url, config.product_url_token),
        ));
    }

    // The newest tab by position must be the handle the click returned.
    let by_index = home.base().switch_to_tab(tabs_before)?;
    if by_index.get_url() != url {
        return Err(SuiteError::step("validate new tab", "tab list and returned handle disagree"));
    }

    let product =
        ProductPage::new(session, product_tab.clone()).with_screenshot_dir(&config.screenshot_dir);
    product.base().take_screenshot("product-page-loaded");

    log::info!("Opening brand store");
    product.open_brand_store()?;
    product.base().take_screenshot("brand-store");

    log::info!("Selecting variant '{}'", config.variant);
    product.select_variant(&config.store_menu_label, &config.variant)?;
    product.base().take_screenshot("variant-selected");

    log::info!("Verifying quick look");
    product.hover_product_image()?;
    match product.quick_look_displayed() {
        Probe::Found => {}
        Probe::NotFound => {
            return Err(SuiteError::step("quick look", "control not displayed after hover"));
        }
        Probe::Unknown(reason) => {
            return Err(SuiteError::step("quick look", format!("could not determine: {}", reason)));
        }
    }
    product.base().take_screenshot("quick-look-displayed");

    let title = product.modal_title()?;
    if !matching::contains_ci(&title, &config.expected_modal_product) {
        return Err(SuiteError::step(
            "validate modal title",
            format!("'{}' does not mention '{}'", title, config.expected_modal_product),
        ));
    }

    match product.validate_modal_content(&config.expected_modal_product) {
        Probe::Found => {}
        Probe::NotFound => {
            return Err(SuiteError::step(
                "validate modal content",
                format!("overlay does not mention '{}'", config.expected_modal_product),
            ));
        }
        Probe::Unknown(reason) => {
            return Err(SuiteError::step(
                "validate modal content",
                format!("could not determine: {}", reason),
            ));
        }
    }
    product.base().take_screenshot("modal-validation");

    log::info!("Search flow completed");
    Ok(())
}

/// Smoke scenario: type the search term, submit, and wait for the result
/// list to render.
pub fn run_basic_search(session: &BrowserSession, config: &FlowConfig) -> Result<()> {
    let tab = session.first_tab()?;
    let home = HomePage::new(session, tab.clone()).with_screenshot_dir(&config.screenshot_dir);

    log::info!("Navigating to {}", config.base_url);
    session.navigate(&tab, &config.base_url)?;
    home.base().wait_for_page_load()?;

    log::info!("Searching for '{}'", config.search_term);
    home.search_product(&config.search_term)
        .and_then(|_| home.submit_search())
        .and_then(|_| home.await_results())
        .map_err(|e| SuiteError::step("basic search", e.to_string()))?;

    log::info!("Basic search completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_consistent() {
        let config = FlowConfig::default();
        // The journey only holds together if the refined term leads to the
        // configured suggestion and result keywords.
        assert!(matching::contains_ci(&config.suggestion, &config.search_term));
        assert!(config.result_keywords.iter().any(|kw| matching::contains_ci(&config.suggestion, kw)));
        assert!(!config.screenshot_dir.is_empty());
    }

    #[test]
    fn test_config_partial_json() {
        let config: FlowConfig =
            serde_json::from_str(r#"{"base_url": "https://staging.example.com", "category": "Books"}"#)
                .expect("partial config should deserialize");

        assert_eq!(config.base_url, "https://staging.example.com");
        assert_eq!(config.category, "Books");
        // Untouched fields keep their defaults.
        assert_eq!(config.search_term, FlowConfig::default().search_term);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = FlowConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: FlowConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.base_url, config.base_url);
        assert_eq!(back.result_keywords, config.result_keywords);
    }
}
