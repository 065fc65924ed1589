use crate::browser::BrowserSession;
use crate::error::{Result, SuiteError};
use crate::pages::base::{self, BasePage, ACTION_TIMEOUT};
use crate::pages::{matching, Probe};
use headless_chrome::Tab;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

// Locators
const STORE_LINK: &str = "#bylineInfo";
const NAV_MENU_CONTROL: &str = r#"a[role="button"] span"#;
const NAV_ITEM_LINK: &str = r#"li[class*="Navigation__navItem"] a"#;
const MODAL_TITLE: &str = r#"a[class*="ProductShowcase__title"]"#;
const TILE_OVERLAY: &str = r#"a[class*="Overlay__overlay"]"#;
const QUICK_LOOK_SPANS: &str = "span";
const QUICK_LOOK_LABEL: &str = "Quick look";

/// Deadline for a clicked navigation menu to lay out its entries.
const MENU_OPEN_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline for hover/click reveals of the quick-look surfaces.
const REVEAL_TIMEOUT: Duration = Duration::from_secs(2);

/// Product detail and brand store page: store link, variant navigation
/// menu and the quick-look modal.
pub struct ProductPage<'s> {
    base: BasePage<'s>,
}

impl<'s> ProductPage<'s> {
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

    /// Scroll to and click the brand-store link, then wait for the store
    /// page to load.
    pub fn open_brand_store(&self) -> Result<()> {
        let link = self.base.wait_for_element_and_scroll(STORE_LINK)?;
        link.click().map_err(|e| SuiteError::Driver(e.to_string()))?;
        self.base.wait_for_page_load()
    }

    /// Open the navigation menu labelled `menu_label` and select the entry
    /// whose text exactly equals `variant`.
    ///
    /// On any failure the whole navigation menu is scanned for an exact
    /// text match as a fallback; a failed fallback propagates.
    pub fn select_variant(&self, menu_label: &str, variant: &str) -> Result<()> {
        match self.try_select_variant(menu_label, variant) {
            Ok(()) => Ok(()),
            Err(err) => {
                log::warn!(
                    "Selecting variant '{}' via menu failed ({}); scanning all menu entries",
                    variant,
                    err
                );
                self.select_variant_by_scan(variant)
            }
        }
    }

    fn try_select_variant(&self, menu_label: &str, variant: &str) -> Result<()> {
        let control = self.base.wait_for_exact_text(NAV_MENU_CONTROL, menu_label, ACTION_TIMEOUT)?;
        control.click().map_err(|e| SuiteError::Driver(e.to_string()))?;

        // The menu animates open; entries being laid out is the completion
        // signal.
        base::wait_until(MENU_OPEN_TIMEOUT, "navigation menu entries visible", || {
            self.base
                .find_all(NAV_ITEM_LINK)
                .iter()
                .any(|entry| base::is_visible(entry).unwrap_or(false))
        })?;

        let entry = self.base.wait_for_exact_text(NAV_ITEM_LINK, variant, ACTION_TIMEOUT)?;
        entry.scroll_into_view().map_err(|e| SuiteError::Driver(e.to_string()))?;
        // Menu entries can still be mid-animation; a hit-tested click may
        // land on the fly-out instead.
        base::force_click(&entry)?;

        self.base.wait_for_page_load()?;
        base::wait_for_page_idle(self.base.tab())?;
        log::info!("Selected variant '{}'", variant);
        Ok(())
    }

    fn select_variant_by_scan(&self, variant: &str) -> Result<()> {
        let entries = self.base.find_all(NAV_ITEM_LINK);
        for entry in &entries {
            let text = entry.get_inner_text().map_err(|e| SuiteError::Driver(e.to_string()))?;
            if text.trim() == variant {
                base::force_click(entry)?;
                self.base.wait_for_page_load()?;
                log::info!("Selected variant '{}' via menu scan", variant);
                return Ok(());
            }
        }

        Err(SuiteError::ElementNotFound(format!(
            "menu entry '{}' after scanning {} entries",
            variant,
            entries.len()
        )))
    }

    /// The quick-look modal's title attribute; empty when absent. Driver
    /// errors propagate.
    pub fn modal_title(&self) -> Result<String> {
        let title = self.base.wait_for_visible(MODAL_TITLE, ACTION_TIMEOUT)?;
        Ok(base::attribute_of(&title, "title")?.unwrap_or_default())
    }

    /// Whether the product overlay's accessibility label mentions
    /// `expected_product`, case-insensitively. Observation only.
    pub fn validate_modal_content(&self, expected_product: &str) -> Probe {
        let overlay = match self.base.wait_for_visible(TILE_OVERLAY, ACTION_TIMEOUT) {
            Ok(element) => element,
            Err(err) if err.is_timeout() => return Probe::NotFound,
            Err(err) => return Probe::Unknown(err.to_string()),
        };

        match base::attribute_of(&overlay, "aria-label") {
            Ok(Some(label)) => {
                log::debug!("Overlay label: {}", label);
                Probe::from_bool(matching::contains_ci(&label, expected_product))
            }
            Ok(None) => Probe::NotFound,
            Err(err) => Probe::Unknown(err.to_string()),
        }
    }

    /// Hover the product tile overlay to reveal the quick-look control.
    ///
    /// The control fading in is the animation's completion signal; it not
    /// appearing is tolerated here and re-checked by the caller.
    pub fn hover_product_image(&self) -> Result<()> {
        let overlay = self.base.wait_for_visible(TILE_OVERLAY, ACTION_TIMEOUT)?;
        overlay.move_mouse_over().map_err(|e| SuiteError::Driver(e.to_string()))?;

        let revealed = base::wait_until(REVEAL_TIMEOUT, "quick-look control revealed", || {
            self.quick_look_control_visible()
        });
        if let Err(e) = revealed {
            log::debug!("Quick-look control not revealed by hover: {}", e);
        }

        Ok(())
    }

    /// If the quick-look control is visible, click it and wait for the
    /// modal; reports what was observed without ever failing the caller.
    pub fn quick_look_displayed(&self) -> Probe {
        let control = match self.base.find_by_exact_text(QUICK_LOOK_SPANS, QUICK_LOOK_LABEL) {
            Ok(Some(element)) => element,
            Ok(None) => return Probe::NotFound,
            Err(err) => return Probe::Unknown(err.to_string()),
        };

        if !base::is_visible(&control).unwrap_or(false) {
            return Probe::NotFound;
        }

        if let Err(err) = control.click() {
            return Probe::Unknown(err.to_string());
        }

        let modal = base::wait_until(REVEAL_TIMEOUT, "quick-look modal title", || {
            self.base
                .find_all(MODAL_TITLE)
                .iter()
                .any(|title| base::is_visible(title).unwrap_or(false))
        });
        if let Err(e) = modal {
            log::debug!("Quick-look modal title not visible after click: {}", e);
        }

        Probe::Found
    }

    fn quick_look_control_visible(&self) -> bool {
        matches!(
            self.base
                .find_by_exact_text(QUICK_LOOK_SPANS, QUICK_LOOK_LABEL)
                .map(|found| found.map(|el| base::is_visible(&el).unwrap_or(false))),
            Ok(Some(true))
        )
    }
}
