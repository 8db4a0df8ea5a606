use crate::scrapers::traits::MapPage;
use crate::scrapers::types::{Locator, Reading, Wait};
use anyhow::Result;
use std::thread;
use std::time::Instant;
use tracing::trace;

/// Reads single fields from the page with a bounded wait.
///
/// An element that does not show up within the wait is reported as `Ok(None)`.
/// Browser failures still come back as `Err`.
pub struct FieldExtractor<'p, P: MapPage + ?Sized> {
    page: &'p P,
    wait: Wait,
}

impl<'p, P: MapPage + ?Sized> FieldExtractor<'p, P> {
    pub fn new(page: &'p P, wait: Wait) -> Self {
        Self { page, wait }
    }

    pub fn read(&self, locator: &Locator, reading: Reading) -> Result<Option<String>> {
        let deadline = Instant::now() + self.wait.timeout;

        loop {
            if let Some(value) = self.page.probe(locator, reading)? {
                return Ok(Some(value.trim().to_string()));
            }

            let now = Instant::now();
            if now >= deadline {
                trace!(selector = %locator.selector, "Element not found in time");
                return Ok(None);
            }
            thread::sleep(self.wait.poll.min(deadline - now));
        }
    }

    pub fn text(&self, locator: &Locator) -> Result<Option<String>> {
        self.read(locator, Reading::Text)
    }

    pub fn attr(&self, locator: &Locator, name: &'static str) -> Result<Option<String>> {
        self.read(locator, Reading::Attribute(name))
    }

    /// Whether the element appears within the wait
    pub fn exists(&self, locator: &Locator) -> Result<bool> {
        Ok(self.text(locator)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::snapshot::SnapshotPage;
    use std::time::Duration;

    fn page() -> SnapshotPage {
        let mut page = SnapshotPage::new(
            r#"<h1>  Corner Barber </h1>
               <a data-item-id="authority" href="https://barber.test">barber.test</a>
               <span id="empty"></span>"#,
        );
        page.navigate("https://maps.test").unwrap();
        page
    }

    fn short_wait() -> Wait {
        Wait {
            timeout: Duration::from_millis(20),
            poll: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_reads_trimmed_text_and_attributes() {
        let page = page();
        let fields = FieldExtractor::new(&page, short_wait());
        assert_eq!(
            fields.text(&Locator::css("h1")).unwrap(),
            Some("Corner Barber".to_string())
        );
        assert_eq!(
            fields
                .attr(&Locator::css("a[data-item-id='authority']"), "href")
                .unwrap(),
            Some("https://barber.test".to_string())
        );
    }

    #[test]
    fn test_absent_element_is_none_after_wait() {
        let page = page();
        let fields = FieldExtractor::new(&page, short_wait());
        let started = Instant::now();
        assert_eq!(fields.text(&Locator::css("button.phone")).unwrap(), None);
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(!fields.exists(&Locator::css("button.phone")).unwrap());
    }

    #[test]
    fn test_present_but_empty_is_distinct_from_absent() {
        let page = page();
        let fields = FieldExtractor::new(&page, short_wait());
        assert_eq!(fields.text(&Locator::css("#empty")).unwrap(), Some(String::new()));
        assert!(fields.exists(&Locator::css("#empty")).unwrap());
    }
}
