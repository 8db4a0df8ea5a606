use crate::models::{PhotoRecord, ReviewRecord};
use crate::scrapers::detail::random_id;
use crate::scrapers::extract::FieldExtractor;
use crate::scrapers::scroll::scroll_until_stable;
use crate::scrapers::selectors;
use crate::scrapers::traits::MapPage;
use crate::scrapers::types::{Locator, Reading, ScrapeConfig};
use anyhow::Result;
use tracing::{debug, warn};

/// Result of collecting from a sub-panel
#[derive(Debug, Clone, PartialEq)]
pub enum PanelOutcome<T> {
    /// The panel toggle never appeared, e.g. a business with no reviews
    Unavailable,
    Collected(Vec<T>),
}

impl<T> PanelOutcome<T> {
    pub fn into_records(self) -> Vec<T> {
        match self {
            PanelOutcome::Unavailable => Vec::new(),
            PanelOutcome::Collected(records) => records,
        }
    }
}

/// Open the reviews panel, scroll it out and read every review node
pub fn collect_reviews<P: MapPage + ?Sized>(
    page: &mut P,
    business_id: &str,
    config: &ScrapeConfig,
) -> Result<PanelOutcome<ReviewRecord>> {
    if !open_panel(page, selectors::REVIEWS_TOGGLE, config)? {
        debug!(business_id, "No reviews panel");
        return Ok(PanelOutcome::Unavailable);
    }
    scroll_main_panel(page, config)?;

    let page = &*page;
    let fields = FieldExtractor::new(page, config.field_wait());
    let nodes = page.count(&Locator::css(selectors::REVIEW_NODE))?;
    let mut reviews = Vec::with_capacity(nodes);

    for idx in 0..nodes {
        let node = Locator::css(selectors::REVIEW_NODE).nth(idx);
        let nested = |selector: &str| Locator::css(selector).within(node.clone());

        let review_id = page
            .probe(&node, Reading::Attribute(selectors::REVIEW_ID_ATTR))?
            .filter(|id| !id.is_empty())
            .unwrap_or_else(random_id);

        reviews.push(ReviewRecord {
            business_id: business_id.to_string(),
            review_id,
            reviewer: fields.text(&nested(selectors::REVIEWER))?.unwrap_or_default(),
            rating: fields
                .attr(&nested(selectors::REVIEW_RATING), "aria-label")?
                .unwrap_or_default(),
            date: fields.text(&nested(selectors::REVIEW_DATE))?.unwrap_or_default(),
            text: fields.text(&nested(selectors::REVIEW_TEXT))?.unwrap_or_default(),
        });
    }

    debug!(business_id, count = reviews.len(), "Collected reviews");
    Ok(PanelOutcome::Collected(reviews))
}

/// Open the photos panel, scroll it out and keep content photo URLs
pub fn collect_photos<P: MapPage + ?Sized>(
    page: &mut P,
    business_id: &str,
    config: &ScrapeConfig,
) -> Result<PanelOutcome<PhotoRecord>> {
    if !open_panel(page, selectors::PHOTOS_TOGGLE, config)? {
        debug!(business_id, "No photos panel");
        return Ok(PanelOutcome::Unavailable);
    }
    scroll_main_panel(page, config)?;

    let images = Locator::css(selectors::PHOTO_IMAGE);
    let mut sources = Vec::new();
    for idx in 0..page.count(&images)? {
        if let Some(src) = page.probe(&images.clone().nth(idx), Reading::Attribute("src"))? {
            sources.push(src);
        }
    }

    let photos: Vec<PhotoRecord> = filter_photo_urls(sources, &config.photo_host_marker)
        .into_iter()
        .map(|photo_url| PhotoRecord {
            business_id: business_id.to_string(),
            photo_url,
        })
        .collect();

    debug!(business_id, count = photos.len(), "Collected photos");
    Ok(PanelOutcome::Collected(photos))
}

/// Keep only URLs served from the content photo host
pub fn filter_photo_urls<I>(urls: I, marker: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    urls.into_iter()
        .filter(|url| !url.is_empty() && url.contains(marker))
        .collect()
}

fn open_panel<P: MapPage + ?Sized>(
    page: &mut P,
    toggle: &str,
    config: &ScrapeConfig,
) -> Result<bool> {
    let toggle = Locator::css(toggle);
    if !FieldExtractor::new(&*page, config.panel_open_wait()).exists(&toggle)? {
        return Ok(false);
    }
    page.click(&toggle)?;
    Ok(true)
}

fn scroll_main_panel<P: MapPage + ?Sized>(page: &mut P, config: &ScrapeConfig) -> Result<()> {
    let panel = Locator::css(selectors::MAIN_PANEL);
    if !FieldExtractor::new(&*page, config.container_wait()).exists(&panel)? {
        warn!("Main panel not found, reading what is loaded");
        return Ok(());
    }

    let summary = scroll_until_stable(&config.panel_policy(), || {
        let extent = page.scroll_extent(&panel)?;
        page.scroll_to_end(&panel)?;
        Ok(extent)
    })?;
    debug!(rounds = summary.rounds, extent = summary.last_reading, "Panel scrolled");
    Ok(())
}
