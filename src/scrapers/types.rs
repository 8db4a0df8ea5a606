use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the user asked to search for
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Town or area appended to the query
    pub location: String,
    /// Business type, e.g. "barber"
    pub query: String,
    /// Directory the CSV files are written into
    pub output_dir: String,
}

impl SearchParams {
    /// Text typed into the map search box
    pub fn search_text(&self) -> String {
        format!("{} {}", self.query.trim(), self.location.trim())
            .trim()
            .to_string()
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            location: String::new(),
            query: String::new(),
            output_dir: "output".to_string(),
        }
    }
}

/// Points at one element: the `index`-th match of `selector`, searched inside
/// `scope` when given, otherwise inside the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub selector: String,
    pub index: usize,
    pub scope: Option<Box<Locator>>,
}

impl Locator {
    pub fn css(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            index: 0,
            scope: None,
        }
    }

    pub fn nth(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn within(mut self, scope: Locator) -> Self {
        self.scope = Some(Box::new(scope));
        self
    }
}

/// Which value of a resolved element to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Text,
    Attribute(&'static str),
}

/// Bounded wait used for every element lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wait {
    pub timeout: Duration,
    pub poll: Duration,
}

/// Stop policy for one scrollable container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPolicy {
    pub idle_rounds: u32,
    pub pause: Duration,
    /// Hard cap on iterations. `None` keeps scrolling until the signal settles.
    pub max_rounds: Option<u32>,
}

/// Every timing and threshold used during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub headless: bool,
    pub window_size: (u32, u32),
    pub navigation_timeout: Duration,
    /// Wait for a single field before it is treated as absent
    pub field_timeout: Duration,
    /// Wait for a reviews/photos toggle before the panel counts as missing
    pub panel_open_timeout: Duration,
    /// Wait for the result feed or a panel container to appear
    pub container_timeout: Duration,
    pub poll_interval: Duration,
    pub feed_idle_rounds: u32,
    pub panel_idle_rounds: u32,
    pub feed_scroll_pause: Duration,
    pub panel_scroll_pause: Duration,
    pub max_scroll_rounds: Option<u32>,
    pub load_settle: Duration,
    pub search_settle: Duration,
    pub card_settle: Duration,
    pub dismiss_settle: Duration,
    /// Substring identifying content photos among page images
    pub photo_host_marker: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/maps".to_string(),
            headless: false,
            window_size: (1366, 900),
            navigation_timeout: Duration::from_secs(60),
            field_timeout: Duration::from_millis(1000),
            panel_open_timeout: Duration::from_millis(3000),
            container_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
            feed_idle_rounds: 5,
            panel_idle_rounds: 8,
            feed_scroll_pause: Duration::from_millis(1200),
            panel_scroll_pause: Duration::from_millis(1200),
            max_scroll_rounds: None,
            load_settle: Duration::from_secs(2),
            search_settle: Duration::from_secs(3),
            card_settle: Duration::from_secs(2),
            dismiss_settle: Duration::from_millis(500),
            photo_host_marker: "googleusercontent".to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Same thresholds as the default but with no pauses and minimal waits
    pub fn instant() -> Self {
        Self {
            field_timeout: Duration::ZERO,
            panel_open_timeout: Duration::ZERO,
            container_timeout: Duration::ZERO,
            poll_interval: Duration::ZERO,
            feed_scroll_pause: Duration::ZERO,
            panel_scroll_pause: Duration::ZERO,
            load_settle: Duration::ZERO,
            search_settle: Duration::ZERO,
            card_settle: Duration::ZERO,
            dismiss_settle: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn field_wait(&self) -> Wait {
        Wait {
            timeout: self.field_timeout,
            poll: self.poll_interval,
        }
    }

    pub fn panel_open_wait(&self) -> Wait {
        Wait {
            timeout: self.panel_open_timeout,
            poll: self.poll_interval,
        }
    }

    pub fn container_wait(&self) -> Wait {
        Wait {
            timeout: self.container_timeout,
            poll: self.poll_interval,
        }
    }

    pub fn feed_policy(&self) -> ScrollPolicy {
        ScrollPolicy {
            idle_rounds: self.feed_idle_rounds,
            pause: self.feed_scroll_pause,
            max_rounds: self.max_scroll_rounds,
        }
    }

    pub fn panel_policy(&self) -> ScrollPolicy {
        ScrollPolicy {
            idle_rounds: self.panel_idle_rounds,
            pause: self.panel_scroll_pause,
            max_rounds: self.max_scroll_rounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_text_joins_query_and_location() {
        let params = SearchParams {
            location: "fethiye".to_string(),
            query: "berber".to_string(),
            ..SearchParams::default()
        };
        assert_eq!(params.search_text(), "berber fethiye");

        let only_query = SearchParams {
            query: "  cafe ".to_string(),
            ..SearchParams::default()
        };
        assert_eq!(only_query.search_text(), "cafe");
    }

    #[test]
    fn test_default_thresholds() {
        let config = ScrapeConfig::default();
        assert_eq!(config.feed_policy().idle_rounds, 5);
        assert_eq!(config.panel_policy().idle_rounds, 8);
        assert_eq!(config.feed_policy().max_rounds, None);
        assert_eq!(SearchParams::default().output_dir, "output");
    }

    #[test]
    fn test_locator_builder() {
        let loc = Locator::css(".name").within(Locator::css("div[data-review-id]").nth(2));
        assert_eq!(loc.index, 0);
        let scope = loc.scope.as_deref().unwrap();
        assert_eq!(scope.selector, "div[data-review-id]");
        assert_eq!(scope.index, 2);
    }
}
