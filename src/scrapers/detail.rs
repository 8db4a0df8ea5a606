use crate::models::BusinessRecord;
use crate::scrapers::extract::FieldExtractor;
use crate::scrapers::selectors;
use crate::scrapers::traits::MapPage;
use crate::scrapers::types::{Locator, ScrapeConfig};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Descriptive fields of a detail view as found on the page.
/// `None` means the element did not appear within the field wait.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailFields {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    pub rating: Option<String>,
    pub review_count: Option<String>,
    pub hours: Option<String>,
}

impl DetailFields {
    /// Read every field independently from the current detail view
    pub fn read<P: MapPage + ?Sized>(page: &P, config: &ScrapeConfig) -> Result<Self> {
        let fields = FieldExtractor::new(page, config.field_wait());
        let text = |selector: &str| fields.text(&Locator::css(selector));

        Ok(Self {
            name: text(selectors::BUSINESS_NAME)?,
            address: text(selectors::ADDRESS)?,
            phone: text(selectors::PHONE)?,
            website: text(selectors::WEBSITE)?,
            category: text(selectors::CATEGORY)?,
            rating: text(selectors::STAR_RATING)?,
            review_count: text(selectors::MORE_REVIEWS)?,
            hours: text(selectors::HOURS)?,
        })
    }

    /// Flatten into a record; fields that were not found become empty strings
    pub fn into_record(self, url: &str, fetched_at: DateTime<Utc>) -> BusinessRecord {
        let (lat, lng) = parse_lat_lng(url);

        BusinessRecord {
            business_id: place_id_from_url(url),
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            review_count: self.review_count.unwrap_or_default(),
            hours: self.hours.unwrap_or_default(),
            lat,
            lng,
            source_url: url.to_string(),
            fetched_at: fetched_at.to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }
}

/// Build the business record for the detail view currently on screen
pub fn parse_business<P: MapPage + ?Sized>(
    page: &P,
    config: &ScrapeConfig,
) -> Result<BusinessRecord> {
    let fields = DetailFields::read(page, config)?;
    let url = page.current_url()?;
    Ok(fields.into_record(&url, Utc::now()))
}

/// Lowercase, replace every non-alphanumeric run with a single hyphen, and
/// strip hyphens at both ends
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.to_lowercase().chars() {
        if ch.is_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// 32 hex characters, used wherever the page offers no identity
pub fn random_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Slug of the path segment after the last `/place/`, or a random id
pub fn place_id_from_url(url: &str) -> String {
    url.rsplit_once("/place/")
        .and_then(|(_, rest)| rest.split('/').next())
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(random_id)
}

/// Latitude and longitude from the `@lat,lng,...` segment of a map URL.
/// Anything unexpected yields a pair of empty strings.
pub fn parse_lat_lng(url: &str) -> (String, String) {
    coordinates(url)
        .map(|(lat, lng)| (lat.to_string(), lng.to_string()))
        .unwrap_or_default()
}

fn coordinates(url: &str) -> Option<(&str, &str)> {
    let (_, after_at) = url.split_once('@')?;
    let segment = after_at.split('/').next()?;
    let mut parts = segment.split(',');
    let lat = parts.next()?;
    let lng = parts.next()?;
    Some((lat, lng))
}
