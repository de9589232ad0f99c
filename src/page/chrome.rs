// src/page/chrome.rs
//! RackTables page adapter backed by a headless Chrome session.
//!
//! Selectors below are the contract with the site. The page layout is
//! RackTables' stock one:
//! - search box `input[name="q"]` on every page,
//! - the properties page carries `div.greynavbar > ul#foldertab`,
//! - an ambiguous search lands on a result listing whose first hit sits at a
//!   fixed position in the layout table,
//! - content blocks are `div`s titled by an `h2`.

use std::{ffi::OsStr, fmt::Display, sync::Arc, time::Duration};

use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};

use super::{AdapterError, Field, FolderTab, PageAdapter, PageSnapshot};
use crate::config::RunOptions;
use crate::core::{sanitize::fold_heading, Wait};
use crate::data::Term;

const SEARCH_BOX: &str = r#"input[name="q"]"#;
const PROPERTIES_MARKER: &str = "div.greynavbar > ul#foldertab";
const FIRST_RESULT: &str =
    "/html/body/div/div[5]/div/table/tbody/tr[2]/td[1]/table/tbody/tr[1]/td[2]/a";

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

const CHROME_FLAGS: &[&str] = &[
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-software-rasterizer",
    "--disable-accelerated-2d-canvas",
    "--disable-webgl",
    "--disable-extensions",
    "--disable-popup-blocking",
    "--disable-notifications",
    "--disable-background-networking",
    "--disable-default-apps",
    "--disable-sync",
    "--disable-component-update",
    "--disable-client-side-phishing-detection",
    "--disable-translate",
    "--disable-features=TranslateUI",
    "--metrics-recording-only",
    "--mute-audio",
    "--no-first-run",
    "--no-default-browser-check",
    "--user-agent=Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36",
];

pub struct ChromeAdapter {
    browser: Browser,
    tab: Arc<Tab>,
    base_url: String,
    wait: Duration,
    settle: Wait,
}

impl ChromeAdapter {
    /// Start Chrome and load `base_url` in the first tab.
    pub fn launch(base_url: String, options: &RunOptions) -> Result<Self, AdapterError> {
        let launch = LaunchOptions::default_builder()
            .headless(options.headless)
            .sandbox(false)
            .window_size(Some((1920, 1080)))
            .ignore_certificate_errors(true)
            .idle_browser_timeout(IDLE_TIMEOUT)
            .args(CHROME_FLAGS.iter().map(|f| OsStr::new(*f)).collect())
            .build()
            .map_err(|e| AdapterError::Session(format!("invalid launch options: {e}")))?;

        let browser = Browser::new(launch)
            .map_err(|e| AdapterError::Session(format!("could not start Chrome: {e}")))?;
        let tab = browser
            .wait_for_initial_tab()
            .map_err(|e| AdapterError::Session(format!("no initial tab: {e}")))?;
        tab.set_default_timeout(options.wait);

        let adapter = Self {
            browser,
            tab,
            base_url,
            wait: options.wait,
            settle: options.settle_wait(),
        };
        adapter.load_base()?;
        logf!("Chrome session ready (headless: {})", options.headless);
        Ok(adapter)
    }

    fn load_base(&self) -> Result<(), AdapterError> {
        let loaded = self
            .tab
            .navigate_to(&self.base_url)
            .and_then(|t| t.wait_until_navigated());
        if let Err(e) = loaded {
            self.ensure_alive()?;
            // The search step reports the consequence for the term.
            logw!("Entry page did not load cleanly: {e}");
        }
        Ok(())
    }

    fn ensure_alive(&self) -> Result<(), AdapterError> {
        self.browser
            .get_version()
            .map(|_| ())
            .map_err(|e| AdapterError::Session(e.to_string()))
    }

    /// `otherwise`, unless the failure was really the browser going away.
    fn lost_or(&self, err: impl Display, otherwise: AdapterError) -> AdapterError {
        match self.ensure_alive() {
            Ok(()) => otherwise,
            Err(_) => AdapterError::Session(err.to_string()),
        }
    }

    fn not_found(&self, what: &str, waited: Duration, err: impl Display) -> AdapterError {
        logd!("{what}: {err}");
        self.lost_or(err, AdapterError::NotFound { what: what.to_string(), waited })
    }

    fn after_navigation(&self) {
        if let Err(e) = self.tab.wait_until_navigated() {
            logd!("Navigation wait ended early: {e}");
        }
    }

    /// JS click first (works on elements covered by overlays), native click as fallback.
    fn safe_click(&self, el: &Element<'_>, what: &str) -> Result<(), AdapterError> {
        if let Err(e) = el.scroll_into_view() {
            logd!("Could not scroll {what} into view: {e}");
        }
        match el.call_js_fn("function() { this.click(); }", vec![], false) {
            Ok(_) => {
                logd!("Clicked {what} via JS");
                return Ok(());
            }
            Err(e) => logw!("JS click on {what} failed: {e}"),
        }
        match el.click() {
            Ok(_) => {
                logd!("Clicked {what} natively");
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                Err(self.lost_or(e, AdapterError::ClickFailed { what: what.to_string(), reason }))
            }
        }
    }

    fn wait_section(&self, heading: &str) -> Result<Element<'_>, AdapterError> {
        self.tab
            .wait_for_xpath_with_custom_timeout(&section_xpath(heading), self.wait)
            .map_err(|e| self.not_found(&format!("section '{heading}'"), self.wait, e))
    }
}

/// `div` holding an `h2` whose normalized, lowercased text equals `heading`.
pub fn section_xpath(heading: &str) -> String {
    format!(
        "//tbody//tr//div[h2[translate(normalize-space(.), '{UPPER}', '{LOWER}')='{}']]",
        fold_heading(heading)
    )
}

pub fn folder_tab_xpath(position: usize) -> String {
    format!("//ul[@id='foldertab']/li[{position}]/a")
}

impl PageAdapter for ChromeAdapter {
    fn open_context(&mut self) -> Result<(), AdapterError> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| AdapterError::Session(format!("could not open tab: {e}")))?;
        tab.set_default_timeout(self.wait);
        self.tab = tab;
        self.load_base()
    }

    fn search(&mut self, term: &Term) -> Result<(), AdapterError> {
        let el = self
            .tab
            .wait_for_element_with_custom_timeout(SEARCH_BOX, self.wait)
            .map_err(|e| self.not_found("search box", self.wait, e))?;

        if let Err(e) = el.call_js_fn("function() { this.value = ''; }", vec![], false) {
            logd!("Could not clear search box: {e}");
        }
        el.type_into(term.as_str())
            .map_err(|e| self.not_found("search box", Duration::ZERO, e))?;
        self.tab
            .press_key("Enter")
            .map_err(|e| self.not_found("search box", Duration::ZERO, e))?;
        self.after_navigation();
        Ok(())
    }

    fn is_properties_page(&mut self) -> Result<bool, AdapterError> {
        let tab = Arc::clone(&self.tab);
        let found = self
            .settle
            .until(|| tab.find_element(PROPERTIES_MARKER).ok().map(|_| ()));
        if found.is_some() {
            logd!("Properties page detected");
            return Ok(true);
        }
        self.ensure_alive()?;
        Ok(false)
    }

    fn click_first_result(&mut self) -> Result<(), AdapterError> {
        let el = self
            .tab
            .find_element_by_xpath(FIRST_RESULT)
            .map_err(|e| self.not_found("first search result", Duration::ZERO, e))?;
        self.safe_click(&el, "first search result")?;
        self.after_navigation();
        Ok(())
    }

    fn open_tab(&mut self, tab: FolderTab) -> Result<(), AdapterError> {
        let what = format!("folder tab {}", tab.position);
        let el = self
            .tab
            .wait_for_xpath_with_custom_timeout(&folder_tab_xpath(tab.position), self.wait)
            .map_err(|e| self.not_found(&what, self.wait, e))?;
        let label = el
            .get_inner_text()
            .map_err(|e| self.not_found(&what, Duration::ZERO, e))?;

        if !label.contains(tab.keyword) {
            return Err(AdapterError::LabelMismatch {
                position: tab.position,
                expected: tab.keyword,
                found: label.trim().to_string(),
            });
        }
        self.safe_click(&el, &what)?;
        self.after_navigation();
        Ok(())
    }

    fn read_field(&mut self, field: &Field) -> Result<Vec<String>, AdapterError> {
        match *field {
            Field::Section { heading } => {
                let block = self.wait_section(heading)?;
                let text = block
                    .get_inner_text()
                    .map_err(|e| self.not_found(heading, Duration::ZERO, e))?;
                Ok(vec![text])
            }
            Field::SectionLinks { heading, hrefs } => {
                let block = self.wait_section(heading)?;
                hrefs
                    .iter()
                    .map(|href| {
                        block
                            .find_element(&format!("h2 a[href*='{href}']"))
                            .and_then(|a| a.get_inner_text())
                            .map_err(|e| {
                                self.not_found(&format!("{heading} link {href}"), Duration::ZERO, e)
                            })
                    })
                    .collect()
            }
            Field::Element { css } => {
                let el = self
                    .tab
                    .wait_for_element_with_custom_timeout(css, self.wait)
                    .map_err(|e| self.not_found(css, self.wait, e))?;
                let text = el
                    .get_inner_text()
                    .map_err(|e| self.not_found(css, Duration::ZERO, e))?;
                Ok(vec![text])
            }
        }
    }

    fn refresh(&mut self) -> Result<(), AdapterError> {
        self.tab.reload(false, None).map_err(|e| {
            self.not_found("reloaded page", self.wait, e)
        })?;
        self.after_navigation();
        Ok(())
    }

    fn snapshot(&mut self) -> Result<PageSnapshot, AdapterError> {
        let screenshot = match self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
        {
            Ok(png) => Some(png),
            Err(e) => {
                logd!("Screenshot failed: {e}");
                None
            }
        };
        let markup = self.tab.get_content().map_err(|e| {
            self.lost_or(e, AdapterError::Empty { what: "page markup".to_string() })
        })?;
        Ok(PageSnapshot { screenshot, markup })
    }

    fn close_surplus(&mut self, ceiling: usize) -> Result<usize, AdapterError> {
        let tabs: Vec<Arc<Tab>> = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|_| AdapterError::Session("tab registry poisoned".to_string()))?
            .clone();
        if tabs.len() <= ceiling {
            return Ok(0);
        }

        let surplus = tabs.len() - ceiling.max(1);
        let mut closed = 0;
        let mut closed_current = false;
        // Oldest first, never the first tab.
        for tab in tabs.iter().skip(1).take(surplus) {
            match tab.close(false) {
                Ok(_) => {
                    closed += 1;
                    if tab.get_target_id() == self.tab.get_target_id() {
                        closed_current = true;
                    }
                }
                Err(e) => {
                    self.ensure_alive()?;
                    logw!("Could not close tab {}: {e}", tab.get_target_id());
                }
            }
        }
        if closed_current {
            self.tab = Arc::clone(&tabs[0]);
        }
        logd!("Closed {closed} surplus tab(s), ceiling {ceiling}");
        Ok(closed)
    }
}
