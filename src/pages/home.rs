use crate::browser::BrowserSession;
use crate::error::{Result, SuiteError};
use crate::pages::base::{self, BasePage, ACTION_TIMEOUT, PROBE_TIMEOUT};
use crate::pages::matching::{self, MatchTier};
use headless_chrome::Tab;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// Locators
const CATEGORY_DROPDOWN: &str = "#searchDropdownBox";
const SEARCH_BOX: &str = "#twotabsearchtextbox";
const SEARCH_SUGGESTIONS: &str = r#"div[class*="autocomplete"] .s-suggestion"#;
const SEARCH_SUBMIT: &str = "#nav-search-submit-button";
const RESULT_LINK: &str = r#"[data-component-type="s-search-result"] h2 a"#;

/// Delay between simulated keystrokes in the search box.
const KEYSTROKE_DELAY: Duration = Duration::from_millis(100);

/// Deadline for a clicked result to surface its new tab.
const NEW_TAB_TIMEOUT: Duration = Duration::from_secs(10);

/// Storefront landing page: category dropdown, search box, suggestion
/// panel and the result list.
pub struct HomePage<'s> {
    base: BasePage<'s>,
}

impl<'s> HomePage<'s> {
    pub fn new(session: &'s BrowserSession, tab: Arc<Tab>) -> Self {
        Self { base: BasePage::new(session, tab) }
    }

    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base = self.base.with_screenshot_dir(dir);
        self
    }

    /// Shared page helpers (waits, tab switching, screenshots).
    pub fn base(&self) -> &BasePage<'s> {
        &self.base
    }

    /// Select `category` from the search dropdown by its visible label.
    ///
    /// The selection is applied on the element and verified back from the
    /// DOM before returning, so the subsequent search runs in the right
    /// category without a guessed pause.
    pub fn select_category(&self, category: &str) -> Result<()> {
        let dropdown = self.base.wait_for_visible(CATEGORY_DROPDOWN, ACTION_TIMEOUT)?;

        let applied = dropdown
            .call_js_fn(
                r#"function(label) {
                    const wanted = Array.from(this.options)
                        .find(o => ((o.label || o.text) || '').trim() === label);
                    if (!wanted) return false;
                    this.value = wanted.value;
                    this.dispatchEvent(new Event('change', { bubbles: true }));
                    return true;
                }"#,
                vec![json!(category)],
                false,
            )
            .map_err(|e| SuiteError::Driver(e.to_string()))?
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        if !applied {
            return Err(SuiteError::ElementNotFound(format!(
                "category option labelled '{}' in '{}'",
                category, CATEGORY_DROPDOWN
            )));
        }

        let probe = format!(
            r#"(function() {{
                const sel = document.querySelector({});
                if (!sel || sel.selectedIndex < 0) return false;
                const o = sel.selectedOptions[0];
                return (((o.label || o.text) || '').trim()) === {};
            }})()"#,
            serde_json::to_string(CATEGORY_DROPDOWN).unwrap_or_else(|_| "''".to_string()),
            serde_json::to_string(category).unwrap_or_else(|_| "''".to_string()),
        );
        base::wait_until(PROBE_TIMEOUT, "category selection applied", || {
            base::eval_bool(self.base.tab(), &probe).unwrap_or(false)
        })
    }

    /// Clear the search box and type `product` character by character.
    ///
    /// The suggestion panel not appearing afterwards is logged and
    /// swallowed; callers re-check suggestions explicitly.
    pub fn search_product(&self, product: &str) -> Result<()> {
        let search_box = self.base.wait_for_visible(SEARCH_BOX, ACTION_TIMEOUT)?;
        search_box.click().map_err(|e| SuiteError::Driver(e.to_string()))?;

        // Drop any previous input, with an input event so stale suggestions
        // are dismissed too.
        search_box
            .call_js_fn(
                r#"function() {
                    this.value = '';
                    this.dispatchEvent(new Event('input', { bubbles: true }));
                }"#,
                vec![],
                false,
            )
            .map_err(|e| SuiteError::Driver(e.to_string()))?;

        for ch in product.chars() {
            self.base
                .tab()
                .type_str(&ch.to_string())
                .map_err(|e| SuiteError::Driver(e.to_string()))?;
            thread::sleep(KEYSTROKE_DELAY);
        }

        if let Err(e) = self.base.wait_for_visible(SEARCH_SUGGESTIONS, PROBE_TIMEOUT) {
            log::warn!("Search suggestions not visible after typing '{}': {}", product, e);
        }

        Ok(())
    }

    /// Trimmed text of every rendered suggestion, in panel order.
    ///
    /// Degrades to an empty list on timeout or driver error; callers must
    /// treat empty as "no suggestions or could not determine".
    pub fn search_suggestions(&self) -> Vec<String> {
        if let Err(e) = self.base.wait_for_visible(SEARCH_SUGGESTIONS, PROBE_TIMEOUT) {
            log::warn!("Suggestion panel did not appear: {}", e);
            return Vec::new();
        }

        match self.base.texts_of(SEARCH_SUGGESTIONS) {
            Ok(texts) => texts,
            Err(e) => {
                log::warn!("Failed to read suggestions: {}", e);
                Vec::new()
            }
        }
    }

    /// Select the suggestion matching `suggestion`, trying exact,
    /// lowercased, uppercased and case-insensitive-substring matches in
    /// that order; with no match, or on any unexpected driver error, fall
    /// back to the plain search-submit control.
    pub fn select_search_suggestion(&self, suggestion: &str) -> Result<()> {
        match self.try_select_suggestion(suggestion) {
            Ok(()) => Ok(()),
            Err(err) => {
                log::warn!(
                    "Selecting suggestion '{}' failed ({}); falling back to search submit",
                    suggestion,
                    err
                );
                self.submit_search()
            }
        }
    }

    fn try_select_suggestion(&self, suggestion: &str) -> Result<()> {
        self.base.wait_for_visible(SEARCH_SUGGESTIONS, ACTION_TIMEOUT)?;

        let texts = self.base.texts_of(SEARCH_SUGGESTIONS)?;
        let Some((index, tier)) = matching::match_suggestion(&texts, suggestion) else {
            log::info!("No suggestion matched '{}'; using search submit", suggestion);
            return self.submit_search();
        };

        let elements = self.base.find_all(SEARCH_SUGGESTIONS);
        let element = elements.get(index).ok_or_else(|| {
            SuiteError::ElementNotFound(format!("suggestion #{} disappeared during selection", index))
        })?;

        log::debug!("Selecting suggestion '{}' ({:?} tier)", texts[index], tier);
        element.scroll_into_view().map_err(|e| SuiteError::Driver(e.to_string()))?;
        match tier {
            // Substring hits may be animating or partially covered.
            MatchTier::Substring => base::force_click(element)?,
            _ => {
                element.click().map_err(|e| SuiteError::Driver(e.to_string()))?;
            }
        }

        self.base.wait_for_page_load()
    }

    /// Click the search-submit control and wait for the result page.
    pub fn submit_search(&self) -> Result<()> {
        let submit = self.base.wait_for_visible(SEARCH_SUBMIT, ACTION_TIMEOUT)?;
        submit.click().map_err(|e| SuiteError::Driver(e.to_string()))?;
        self.base.wait_for_page_load()
    }

    /// Wait until the result list is rendered.
    pub fn await_results(&self) -> Result<()> {
        self.base.wait_for_visible(RESULT_LINK, ACTION_TIMEOUT)?;
        Ok(())
    }

    /// Click the first result whose title contains every keyword
    /// case-insensitively; the click opens a new tab, whose handle is
    /// awaited and returned.
    pub fn click_first_search_result<S: AsRef<str>>(&self, keywords: &[S]) -> Result<Arc<Tab>> {
        self.base.wait_for_visible(RESULT_LINK, ACTION_TIMEOUT)?;

        let links = self.base.find_all(RESULT_LINK);
        log::debug!("Scanning {} result links", links.len());
        let before = self.base.session().tab_count()?;

        for link in &links {
            let title = link.get_inner_text().map_err(|e| SuiteError::Driver(e.to_string()))?;
            let title = title.trim();
            if !matching::title_matches(title, keywords) {
                continue;
            }

            log::info!("Clicking result '{}'", title);
            link.scroll_into_view().map_err(|e| SuiteError::Driver(e.to_string()))?;
            link.click().map_err(|e| SuiteError::Driver(e.to_string()))?;
            return self.await_new_tab(before);
        }

        let wanted: Vec<&str> = keywords.iter().map(|kw| kw.as_ref()).collect();
        Err(SuiteError::ElementNotFound(format!(
            "search result matching {:?} after scanning {} links",
            wanted,
            links.len()
        )))
    }

    fn await_new_tab(&self, previous_count: usize) -> Result<Arc<Tab>> {
        let session = self.base.session();
        base::wait_until(NEW_TAB_TIMEOUT, "new tab opened by result click", || {
            session.tab_count().map(|count| count > previous_count).unwrap_or(false)
        })?;

        let tab = self.base.latest_tab()?;
        tab.activate()
            .map_err(|e| SuiteError::TabOperationFailed(format!("Failed to activate new tab: {}", e)))?;
        Ok(tab)
    }

    /// True iff the open-tab count now exceeds `original_count`.
    pub fn new_tab_opened(&self, original_count: usize) -> Result<bool> {
        Ok(self.base.session().tab_count()? > original_count)
    }

    /// True iff suggestions are non-empty and every entry contains
    /// `search_term` case-insensitively. The panel is re-read; an empty
    /// read is always false.
    pub fn validate_search_suggestions(&self, search_term: &str) -> bool {
        matching::all_contain(&self.search_suggestions(), search_term)
    }
}
