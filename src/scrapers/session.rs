use crate::models::ScrapeOutput;
use crate::scrapers::collectors::{collect_photos, collect_reviews};
use crate::scrapers::detail::parse_business;
use crate::scrapers::extract::FieldExtractor;
use crate::scrapers::scroll::{pause, scroll_until_stable};
use crate::scrapers::selectors;
use crate::scrapers::traits::MapPage;
use crate::scrapers::types::{Locator, ScrapeConfig};
use anyhow::Result;
use tracing::{debug, info, warn};

/// Where a session is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    SearchSubmitted,
    FeedLoaded { cards: usize },
    PerCardIterating { index: usize },
    Done,
}

/// Drives one page through search, feed scrolling and every result card.
///
/// Records accumulate in memory and are handed back only when the run finishes.
pub struct MapsSession<P: MapPage> {
    page: P,
    config: ScrapeConfig,
    state: SessionState,
    output: ScrapeOutput,
}

impl<P: MapPage> MapsSession<P> {
    pub fn new(page: P, config: ScrapeConfig) -> Self {
        Self {
            page,
            config,
            state: SessionState::NotStarted,
            output: ScrapeOutput::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Run the whole session and close the page at the end
    pub fn run(&mut self, search_text: &str) -> Result<ScrapeOutput> {
        self.submit_search(search_text)?;
        let cards = self.load_feed()?;

        for index in 0..cards {
            self.visit_card(index)?;
        }

        self.page.close()?;
        self.transition(SessionState::Done);

        info!(
            businesses = self.output.businesses.len(),
            reviews = self.output.reviews.len(),
            photos = self.output.photos.len(),
            "Session finished"
        );
        Ok(std::mem::take(&mut self.output))
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "Session state change");
        self.state = next;
    }

    fn submit_search(&mut self, search_text: &str) -> Result<()> {
        info!(url = %self.config.base_url, "Opening map search");
        self.page.navigate(&self.config.base_url)?;
        pause(self.config.load_settle);

        info!(query = search_text, "Submitting search");
        self.page
            .submit_search(&Locator::css(selectors::SEARCH_INPUT), search_text)?;
        pause(self.config.search_settle);

        self.transition(SessionState::SearchSubmitted);
        Ok(())
    }

    fn load_feed(&mut self) -> Result<usize> {
        let feed = Locator::css(selectors::RESULT_FEED);
        let cards = card_locator();

        if !FieldExtractor::new(&self.page, self.config.container_wait()).exists(&feed)? {
            warn!("Result feed did not appear, nothing to visit");
            self.transition(SessionState::FeedLoaded { cards: 0 });
            return Ok(0);
        }

        info!("Scrolling result feed...");
        let policy = self.config.feed_policy();
        let page = &mut self.page;
        let summary = scroll_until_stable(&policy, || {
            let count = page.count(&cards)? as u64;
            page.scroll_to_end(&feed)?;
            Ok(count)
        })?;

        let count = self.page.count(&cards)?;
        info!(cards = count, rounds = summary.rounds, "Result feed loaded");
        self.transition(SessionState::FeedLoaded { cards: count });
        Ok(count)
    }

    fn visit_card(&mut self, index: usize) -> Result<()> {
        self.transition(SessionState::PerCardIterating { index });

        self.page.click(&card_locator().nth(index))?;
        pause(self.config.card_settle);

        let business = parse_business(&self.page, &self.config)?;
        if business.is_complete() {
            info!(index, name = %business.name, id = %business.business_id, "Scraping business");
            let business_id = business.business_id.clone();
            self.output.businesses.push(business);

            let reviews = collect_reviews(&mut self.page, &business_id, &self.config)?;
            self.output.reviews.extend(reviews.into_records());

            let photos = collect_photos(&mut self.page, &business_id, &self.config)?;
            self.output.photos.extend(photos.into_records());
        } else {
            warn!(
                index,
                name = %business.name,
                url = %business.source_url,
                "Skipping card without name or address"
            );
        }

        self.page.dismiss()?;
        pause(self.config.dismiss_settle);
        Ok(())
    }
}

fn card_locator() -> Locator {
    Locator::css(selectors::RESULT_CARD).within(Locator::css(selectors::RESULT_FEED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::snapshot::SnapshotPage;

    const START: &str = r#"<input aria-label="Search Google Maps">"#;

    #[test]
    fn test_session_walks_every_state() {
        let feed = r#"<div role="feed">
            <div role="article"><a href="https://maps.test/place/A/@1,2">A</a></div>
        </div>"#;
        let detail = r#"<h1>A</h1><button data-item-id="address">Street 1</button>"#;
        let page = SnapshotPage::new(START)
            .with_results([feed])
            .with_detail("https://maps.test/place/A/@1,2", detail);

        let mut session = MapsSession::new(page, ScrapeConfig::instant());
        assert_eq!(session.state(), SessionState::NotStarted);

        let output = session.run("barber fethiye").unwrap();
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(session.page().searched(), Some("barber fethiye"));
        assert!(session.page().is_closed());
        assert_eq!(session.page().dismissals(), 1);
        assert_eq!(output.businesses.len(), 1);
        assert_eq!(output.businesses[0].business_id, "a");
    }

    #[test]
    fn test_missing_feed_yields_no_records() {
        let page = SnapshotPage::new(START).with_results(["<p>No results</p>"]);
        let mut session = MapsSession::new(page, ScrapeConfig::instant());
        let output = session.run("nothing here").unwrap();
        assert!(output.businesses.is_empty());
        assert_eq!(session.state(), SessionState::Done);
    }

    #[test]
    fn test_missing_search_box_is_fatal() {
        let page = SnapshotPage::new("<p>consent wall</p>");
        let mut session = MapsSession::new(page, ScrapeConfig::instant());
        assert!(session.run("cafe").is_err());
        assert_eq!(session.state(), SessionState::NotStarted);
    }
}
