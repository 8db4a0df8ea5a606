use crate::scrapers::traits::MapPage;
use crate::scrapers::types::{Locator, Reading};
use anyhow::{anyhow, bail, Result};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

/// Offline `MapPage` replaying recorded HTML documents.
///
/// The page moves through three documents: the start page shown after
/// `navigate`, the result list shown after `submit_search`, and one detail
/// document per card, keyed by the place URL the card links to. The result list
/// may be recorded as several states; each scroll of the list shows the next
/// one, which is how lazy loading of the feed is replayed.
pub struct SnapshotPage {
    start: Html,
    results: Vec<Html>,
    details: HashMap<String, Html>,
    view: View,
    results_state: usize,
    url: String,
    searched: Option<String>,
    dismissals: usize,
    closed: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum View {
    Blank,
    Start,
    Results,
    Detail(String),
}

impl SnapshotPage {
    pub fn new(start_html: &str) -> Self {
        Self {
            start: Html::parse_document(start_html),
            results: Vec::new(),
            details: HashMap::new(),
            view: View::Blank,
            results_state: 0,
            url: String::new(),
            searched: None,
            dismissals: 0,
            closed: false,
        }
    }

    /// Record successive states of the result list
    pub fn with_results<'a>(mut self, states: impl IntoIterator<Item = &'a str>) -> Self {
        self.results = states.into_iter().map(Html::parse_document).collect();
        self
    }

    /// Record the detail view opened by cards linking to `url`
    pub fn with_detail(mut self, url: &str, html: &str) -> Self {
        self.details
            .insert(url.to_string(), Html::parse_document(html));
        self
    }

    /// Text submitted through the search box, if any
    pub fn searched(&self) -> Option<&str> {
        self.searched.as_deref()
    }

    pub fn dismissals(&self) -> usize {
        self.dismissals
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn document(&self) -> Option<&Html> {
        match &self.view {
            View::Blank => None,
            View::Start => Some(&self.start),
            View::Results => self.results.get(self.results_state),
            View::Detail(url) => self.details.get(url),
        }
    }

    fn require_document(&self) -> Result<&Html> {
        if self.closed {
            bail!("page is closed");
        }
        self.document()
            .ok_or_else(|| anyhow!("no document loaded for {:?}", self.view))
    }

    fn place_link(element: ElementRef<'_>) -> Result<Option<String>> {
        if let Some(href) = element.value().attr("href") {
            return Ok(Some(href.to_string()));
        }
        let link = parse_selector("a[href]")?;
        Ok(element
            .select(&link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string))
    }
}

impl MapPage for SnapshotPage {
    fn navigate(&mut self, url: &str) -> Result<()> {
        if self.closed {
            bail!("page is closed");
        }
        self.url = url.to_string();
        self.view = View::Start;
        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        Ok(match &self.view {
            View::Detail(url) => url.clone(),
            _ => self.url.clone(),
        })
    }

    fn submit_search(&mut self, input: &Locator, text: &str) -> Result<()> {
        let doc = self.require_document()?;
        if resolve(doc, input)?.is_none() {
            bail!("search input `{}` not found", input.selector);
        }
        self.searched = Some(text.to_string());
        self.url = format!("{}/search/{}", self.url.trim_end_matches('/'), text.replace(' ', "+"));
        self.view = View::Results;
        self.results_state = 0;
        Ok(())
    }

    fn probe(&self, locator: &Locator, reading: Reading) -> Result<Option<String>> {
        let Some(doc) = self.document() else {
            return Ok(None);
        };
        let value = resolve(doc, locator)?.map(|element| match reading {
            Reading::Text => element.text().collect::<String>().trim().to_string(),
            Reading::Attribute(name) => element
                .value()
                .attr(name)
                .unwrap_or_default()
                .trim()
                .to_string(),
        });
        Ok(value)
    }

    fn count(&self, locator: &Locator) -> Result<usize> {
        match self.document() {
            Some(doc) => Ok(matches(doc, locator)?.len()),
            None => Ok(0),
        }
    }

    fn scroll_extent(&self, container: &Locator) -> Result<u64> {
        let doc = self.require_document()?;
        let element = resolve(doc, container)?
            .ok_or_else(|| anyhow!("container `{}` not found", container.selector))?;
        Ok(element.descendants().count() as u64)
    }

    fn scroll_to_end(&mut self, container: &Locator) -> Result<()> {
        let doc = self.require_document()?;
        if resolve(doc, container)?.is_none() {
            bail!("container `{}` not found", container.selector);
        }
        if self.view == View::Results && self.results_state + 1 < self.results.len() {
            self.results_state += 1;
            debug!(state = self.results_state, "Replaying next result list state");
        }
        Ok(())
    }

    fn click(&mut self, target: &Locator) -> Result<()> {
        let doc = self.require_document()?;
        let element = resolve(doc, target)?
            .ok_or_else(|| anyhow!("click target `{}` not found", target.selector))?;
        if self.view == View::Results {
            if let Some(url) = Self::place_link(element)? {
                if self.details.contains_key(&url) {
                    self.view = View::Detail(url);
                }
            }
        }
        Ok(())
    }

    fn dismiss(&mut self) -> Result<()> {
        if matches!(self.view, View::Detail(_)) {
            self.view = View::Results;
        }
        self.dismissals += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("invalid selector `{}`: {:?}", selector, e))
}

fn matches<'a>(doc: &'a Html, locator: &Locator) -> Result<Vec<ElementRef<'a>>> {
    let selector = parse_selector(&locator.selector)?;
    let found = match locator.scope.as_deref() {
        Some(scope) => match resolve(doc, scope)? {
            Some(root) => root.select(&selector).collect(),
            None => Vec::new(),
        },
        None => doc.select(&selector).collect(),
    };
    Ok(found)
}

fn resolve<'a>(doc: &'a Html, locator: &Locator) -> Result<Option<ElementRef<'a>>> {
    Ok(matches(doc, locator)?.into_iter().nth(locator.index))
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = r#"<html><body><input aria-label="Search"></body></html>"#;

    fn results(cards: &[&str]) -> String {
        let body: String = cards
            .iter()
            .map(|url| format!(r#"<div role="article"><a href="{url}">card</a></div>"#))
            .collect();
        format!(r#"<html><body><div role="feed">{body}</div></body></html>"#)
    }

    #[test]
    fn test_navigation_between_views() {
        let list = results(&["https://maps.test/place/A"]);
        let mut page = SnapshotPage::new(START)
            .with_results([list.as_str()])
            .with_detail("https://maps.test/place/A", "<h1> Shop A </h1>");

        page.navigate("https://maps.test").unwrap();
        page.submit_search(&Locator::css("input[aria-label='Search']"), "cafe x")
            .unwrap();
        assert_eq!(page.searched(), Some("cafe x"));

        let card = Locator::css("div[role='article']").within(Locator::css("div[role='feed']"));
        assert_eq!(page.count(&card).unwrap(), 1);

        page.click(&card).unwrap();
        assert_eq!(page.current_url().unwrap(), "https://maps.test/place/A");
        assert_eq!(
            page.probe(&Locator::css("h1"), Reading::Text).unwrap(),
            Some("Shop A".to_string())
        );

        page.dismiss().unwrap();
        assert_eq!(page.count(&card).unwrap(), 1);
        assert_eq!(page.dismissals(), 1);
    }

    #[test]
    fn test_scrolling_replays_result_states() {
        let first = results(&["a"]);
        let second = results(&["a", "b"]);
        let mut page = SnapshotPage::new(START).with_results([first.as_str(), second.as_str()]);
        page.navigate("https://maps.test").unwrap();
        page.submit_search(&Locator::css("input"), "q").unwrap();

        let feed = Locator::css("div[role='feed']");
        let card = Locator::css("div[role='article']").within(feed.clone());
        assert_eq!(page.count(&card).unwrap(), 1);
        page.scroll_to_end(&feed).unwrap();
        assert_eq!(page.count(&card).unwrap(), 2);
        page.scroll_to_end(&feed).unwrap();
        assert_eq!(page.count(&card).unwrap(), 2);
    }

    #[test]
    fn test_missing_attribute_reads_empty() {
        let mut page = SnapshotPage::new(r#"<div id="x" data-a=" v "></div>"#);
        page.navigate("about:blank").unwrap();
        let x = Locator::css("#x");
        assert_eq!(
            page.probe(&x, Reading::Attribute("data-a")).unwrap(),
            Some("v".to_string())
        );
        assert_eq!(
            page.probe(&x, Reading::Attribute("data-b")).unwrap(),
            Some(String::new())
        );
        assert_eq!(page.probe(&Locator::css("#y"), Reading::Text).unwrap(), None);
    }

    #[test]
    fn test_click_on_missing_element_fails() {
        let mut page = SnapshotPage::new(START);
        page.navigate("https://maps.test").unwrap();
        assert!(page.click(&Locator::css("button")).is_err());
        assert!(page.probe(&Locator::css("div[[["), Reading::Text).is_err());
    }
}
