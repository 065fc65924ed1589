use crate::browser::BrowserSession;
use crate::error::{Result, SuiteError};
use crate::pages::Probe;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Element, Tab};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use std::{fs, thread};

/// Polling interval for every condition-based wait.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Deadline for action-style waits (visibility before a click, page load).
pub(crate) const ACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline for probe-style waits; expiry means "not found", not an error.
pub(crate) const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";

/// Common page helpers shared by all page abstractions.
///
/// Wraps one tab handle plus the owning session (needed for tab-list
/// operations). Page objects embed a `BasePage` and delegate to it.
pub struct BasePage<'s> {
    session: &'s BrowserSession,
    tab: Arc<Tab>,
    screenshot_dir: PathBuf,
}

impl<'s> BasePage<'s> {
    pub fn new(session: &'s BrowserSession, tab: Arc<Tab>) -> Self {
        Self { session, tab, screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR) }
    }

    /// Override the directory diagnostic screenshots are written to.
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// The tab this page operates on.
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    pub fn session(&self) -> &'s BrowserSession {
        self.session
    }

    /// Block until this tab's document content is parsed.
    ///
    /// Driver timeouts propagate; there is no retry at this level.
    pub fn wait_for_page_load(&self) -> Result<()> {
        wait_for_load(&self.tab)
    }

    /// Bring the tab at `index` (zero-based, opening order) to the
    /// foreground and wait for its content to load.
    pub fn switch_to_tab(&self, index: usize) -> Result<Arc<Tab>> {
        let tabs = self.session.tabs()?;
        if index >= tabs.len() {
            return Err(SuiteError::TabIndexOutOfRange { index, open: tabs.len() });
        }

        let tab = tabs[index].clone();
        tab.activate()
            .map_err(|e| SuiteError::TabOperationFailed(format!("Failed to activate tab {}: {}", index, e)))?;
        wait_for_load(&tab)?;
        Ok(tab)
    }

    /// The most recently opened tab, waited for load.
    pub fn latest_tab(&self) -> Result<Arc<Tab>> {
        let tab = self.session.latest_tab()?;
        wait_for_load(&tab)?;
        Ok(tab)
    }

    /// Wait for the element matching `selector` to become visible, then
    /// scroll it into view and return it.
    pub fn wait_for_element_and_scroll(&self, selector: &str) -> Result<Element<'_>> {
        let element = self.wait_for_visible(selector, ACTION_TIMEOUT)?;
        element.scroll_into_view().map_err(|e| SuiteError::Driver(e.to_string()))?;
        Ok(element)
    }

    /// Observation-only visibility probe with the shorter deadline.
    ///
    /// Expiry is `NotFound`, not an error. A dead driver times out the same
    /// way a missing element does, so on expiry the tab is pinged once to
    /// tell the two apart.
    pub fn element_exists(&self, selector: &str) -> Probe {
        match self.wait_for_visible(selector, PROBE_TIMEOUT) {
            Ok(_) => Probe::Found,
            Err(err) if err.is_timeout() => match self.tab.evaluate("true", false) {
                Ok(_) => Probe::NotFound,
                Err(e) => Probe::Unknown(e.to_string()),
            },
            Err(err) => Probe::Unknown(err.to_string()),
        }
    }

    /// Capture a diagnostic screenshot tagged with `name` and a timestamp.
    ///
    /// Best-effort: failures are logged and never surfaced to the caller.
    pub fn take_screenshot(&self, name: &str) {
        if let Err(e) = self.try_screenshot(name) {
            log::warn!("Screenshot '{}' failed: {}", name, e);
        }
    }

    fn try_screenshot(&self, name: &str) -> Result<()> {
        fs::create_dir_all(&self.screenshot_dir)?;

        let stamp = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0);
        let png = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| SuiteError::Driver(e.to_string()))?;

        fs::write(self.screenshot_dir.join(format!("{}-{}.png", name, stamp)), png)?;
        Ok(())
    }

    /// Poll for the element to be present and visible until `timeout`.
    pub(crate) fn wait_for_visible(&self, selector: &str, timeout: Duration) -> Result<Element<'_>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.tab.find_element(selector) {
                if is_visible(&element).unwrap_or(false) {
                    return Ok(element);
                }
            }
            if Instant::now() >= deadline {
                return Err(SuiteError::timeout(
                    timeout.as_millis() as u64,
                    format!("element '{}' visible", selector),
                ));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// All elements matching `selector`; an unmatched selector is an empty
    /// list, not an error.
    pub(crate) fn find_all(&self, selector: &str) -> Vec<Element<'_>> {
        self.tab.find_elements(selector).unwrap_or_default()
    }

    /// Trimmed inner text of every element matching `selector`, in DOM order.
    pub(crate) fn texts_of(&self, selector: &str) -> Result<Vec<String>> {
        self.find_all(selector)
            .iter()
            .map(|element| {
                element
                    .get_inner_text()
                    .map(|text| text.trim().to_string())
                    .map_err(|e| SuiteError::Driver(e.to_string()))
            })
            .collect()
    }

    /// First element matching `selector` whose trimmed text equals `text`.
    pub(crate) fn find_by_exact_text(&self, selector: &str, text: &str) -> Result<Option<Element<'_>>> {
        for element in self.find_all(selector) {
            let inner = element.get_inner_text().map_err(|e| SuiteError::Driver(e.to_string()))?;
            if inner.trim() == text {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    /// Poll for a visible element matching `selector` with trimmed text
    /// exactly equal to `text`.
    pub(crate) fn wait_for_exact_text(&self, selector: &str, text: &str, timeout: Duration) -> Result<Element<'_>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(element) = self.find_by_exact_text(selector, text)? {
                if is_visible(&element).unwrap_or(false) {
                    return Ok(element);
                }
            }
            if Instant::now() >= deadline {
                return Err(SuiteError::timeout(
                    timeout.as_millis() as u64,
                    format!("element '{}' with text '{}' visible", selector, text),
                ));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Wait until the tab's pending navigation settles and its document content
/// is parsed.
pub(crate) fn wait_for_load(tab: &Arc<Tab>) -> Result<()> {
    tab.wait_until_navigated()
        .map_err(|e| SuiteError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

    wait_until(ACTION_TIMEOUT, "document content parsed", || {
        eval_bool(tab, "document.readyState !== 'loading'").unwrap_or(false)
    })
}

/// Wait until the document reports a fully loaded state. Used after
/// navigations triggered by in-page clicks, where subresources matter.
pub(crate) fn wait_for_page_idle(tab: &Arc<Tab>) -> Result<()> {
    wait_until(ACTION_TIMEOUT, "document fully loaded", || {
        eval_bool(tab, "document.readyState === 'complete'").unwrap_or(false)
    })
}

/// Generic condition poller; every settle wait in the suite goes through
/// here so deadlines and the poll interval stay uniform.
pub(crate) fn wait_until<F>(timeout: Duration, condition: &str, mut probe: F) -> Result<()>
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if probe() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(SuiteError::timeout(timeout.as_millis() as u64, condition));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Evaluate a JS expression on the tab, expecting a boolean.
pub(crate) fn eval_bool(tab: &Arc<Tab>, expression: &str) -> Result<bool> {
    let result = tab.evaluate(expression, false).map_err(|e| SuiteError::Driver(e.to_string()))?;
    Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
}

/// Visibility check: laid out with non-zero size and not styled away.
pub(crate) fn is_visible(element: &Element) -> Result<bool> {
    let result = element
        .call_js_fn(
            r#"function() {
                const rect = this.getBoundingClientRect();
                const style = window.getComputedStyle(this);
                return rect.width > 0 && rect.height > 0
                    && style.visibility !== 'hidden' && style.display !== 'none';
            }"#,
            vec![],
            false,
        )
        .map_err(|e| SuiteError::Driver(e.to_string()))?;

    Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
}

/// Dispatch a DOM click on the element, bypassing hit-testing. Used where
/// an entry may be animating or partially covered.
pub(crate) fn force_click(element: &Element) -> Result<()> {
    element
        .call_js_fn("function() { this.click(); }", vec![], false)
        .map_err(|e| SuiteError::Driver(e.to_string()))?;
    Ok(())
}

/// Read an attribute off the element; `None` when absent.
pub(crate) fn attribute_of(element: &Element, name: &str) -> Result<Option<String>> {
    let result = element
        .call_js_fn("function(name) { return this.getAttribute(name); }", vec![json!(name)], false)
        .map_err(|e| SuiteError::Driver(e.to_string()))?;

    Ok(result.value.and_then(|v| v.as_str().map(str::to_string)))
}
