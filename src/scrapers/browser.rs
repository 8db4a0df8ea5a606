use crate::scrapers::traits::MapPage;
use crate::scrapers::types::{Locator, Reading, ScrapeConfig};
use anyhow::{bail, Context, Result};
use headless_chrome::browser::tab::point::Point;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Long fixed pauses happen between CDP calls; keep the connection open through them
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(600);

/// `MapPage` backed by a single Chrome tab
pub struct ChromeMapPage {
    // Dropping the browser shuts the Chrome process down
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeMapPage {
    /// Launch Chrome and open the one tab used for the whole run
    pub fn launch(config: &ScrapeConfig) -> Result<Self> {
        info!(headless = config.headless, "Launching Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some(config.window_size))
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open a browser tab")?;
        tab.set_default_timeout(config.navigation_timeout);

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    fn evaluate(&self, script: &str) -> Result<Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .context("Script evaluation failed")?;
        Ok(result.value.unwrap_or(Value::Null))
    }

    /// Run `body` with `el` bound to the located element, or return null when absent
    fn with_element(&self, locator: &Locator, body: &str) -> Result<Value> {
        self.evaluate(&format!(
            "(() => {{ const el = {}; if (!el) return null; {} }})()",
            element_expr(locator),
            body
        ))
    }
}

impl MapPage for ChromeMapPage {
    fn navigate(&mut self, url: &str) -> Result<()> {
        debug!(url, "Navigating");
        self.tab
            .navigate_to(url)
            .with_context(|| format!("Failed to navigate to {}", url))?
            .wait_until_navigated()
            .with_context(|| format!("Navigation timeout for {}", url))?;
        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        Ok(self.tab.get_url())
    }

    fn submit_search(&mut self, input: &Locator, text: &str) -> Result<()> {
        let focused = self.with_element(input, "el.focus(); el.value = ''; return true;")?;
        if focused != Value::Bool(true) {
            bail!("Search input `{}` not found", input.selector);
        }
        self.tab.type_str(text)?.press_key("Enter")?;
        Ok(())
    }

    fn probe(&self, locator: &Locator, reading: Reading) -> Result<Option<String>> {
        let body = match reading {
            Reading::Text => "return (el.innerText || el.textContent || '').trim();".to_string(),
            Reading::Attribute(name) => format!(
                "return (el.getAttribute({}) || '').trim();",
                js_string(name)
            ),
        };
        Ok(self
            .with_element(locator, &body)?
            .as_str()
            .map(str::to_string))
    }

    fn count(&self, locator: &Locator) -> Result<usize> {
        let value = self.evaluate(&format!("{}.length", all_expr(locator)))?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    fn scroll_extent(&self, container: &Locator) -> Result<u64> {
        let value = self.with_element(container, "return el.scrollHeight;")?;
        match value.as_u64().or_else(|| value.as_f64().map(|h| h as u64)) {
            Some(height) => Ok(height),
            None => bail!("Container `{}` not found", container.selector),
        }
    }

    fn scroll_to_end(&mut self, container: &Locator) -> Result<()> {
        let scrolled =
            self.with_element(container, "el.scrollBy(0, el.scrollHeight); return true;")?;
        if scrolled != Value::Bool(true) {
            bail!("Container `{}` not found", container.selector);
        }
        Ok(())
    }

    /// Real mouse click at the element's center, so overlays on top of it
    /// (like the result card link) receive the click the way a user's would
    fn click(&mut self, target: &Locator) -> Result<()> {
        let center = self.with_element(target, CENTER_SCRIPT)?;
        let Some(raw) = center.as_str() else {
            bail!("Click target `{}` not found", target.selector);
        };
        let bounds: Value = serde_json::from_str(raw).context("Unreadable element bounds")?;
        let point = center_point(&bounds)
            .with_context(|| format!("Click target `{}` is not visible", target.selector))?;
        self.tab
            .click_point(point)
            .with_context(|| format!("Failed to click `{}`", target.selector))?;
        Ok(())
    }

    fn dismiss(&mut self) -> Result<()> {
        self.tab.press_key("Escape")?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        info!("Closing browser");
        self.tab.close(false).context("Failed to close tab")?;
        Ok(())
    }
}

/// Scroll the element into view and report its center in viewport coordinates.
/// Serialized to a string because `evaluate` only returns primitives by value.
const CENTER_SCRIPT: &str = "el.scrollIntoView({ block: 'center' }); \
    const r = el.getBoundingClientRect(); \
    return JSON.stringify({ x: r.left + r.width / 2, y: r.top + r.height / 2, w: r.width, h: r.height });";

/// Click point from the object returned by `CENTER_SCRIPT`; zero-sized boxes have none
fn center_point(value: &Value) -> Option<Point> {
    let field = |name: &str| value.get(name).and_then(Value::as_f64);
    if field("w")? <= 0.0 || field("h")? <= 0.0 {
        return None;
    }
    Some(Point {
        x: field("x")?,
        y: field("y")?,
    })
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn root_expr(locator: &Locator) -> String {
    locator
        .scope
        .as_deref()
        .map(element_expr)
        .unwrap_or_else(|| "document".to_string())
}

/// JavaScript expression evaluating to the located element or null
fn element_expr(locator: &Locator) -> String {
    format!(
        "(() => {{ const root = {}; return root ? root.querySelectorAll({}).item({}) : null; }})()",
        root_expr(locator),
        js_string(&locator.selector),
        locator.index
    )
}

/// JavaScript expression evaluating to every match of the locator's selector
fn all_expr(locator: &Locator) -> String {
    format!(
        "(() => {{ const root = {}; return root ? Array.from(root.querySelectorAll({})) : []; }})()",
        root_expr(locator),
        js_string(&locator.selector)
    )
}
