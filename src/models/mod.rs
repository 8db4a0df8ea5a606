/// A record that can be written as one row of a delimited file.
///
/// Column order is fixed by `HEADERS`; `row` must yield values in the same order.
pub trait TabularRecord {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<&str>;
}

/// One business entry scraped from a detail view
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessRecord {
    pub business_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub category: String,
    pub rating: String,
    pub review_count: String,
    pub hours: String,
    pub lat: String,
    pub lng: String,
    pub source_url: String,
    pub fetched_at: String,
}

impl BusinessRecord {
    /// A record is kept only when both name and address were found
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.address.is_empty()
    }
}

impl TabularRecord for BusinessRecord {
    const HEADERS: &'static [&'static str] = &[
        "business_id",
        "name",
        "address",
        "phone",
        "website",
        "category",
        "rating",
        "review_count",
        "hours",
        "lat",
        "lng",
        "source_url",
        "fetched_at",
    ];

    fn row(&self) -> Vec<&str> {
        vec![
            self.business_id.as_str(),
            self.name.as_str(),
            self.address.as_str(),
            self.phone.as_str(),
            self.website.as_str(),
            self.category.as_str(),
            self.rating.as_str(),
            self.review_count.as_str(),
            self.hours.as_str(),
            self.lat.as_str(),
            self.lng.as_str(),
            self.source_url.as_str(),
            self.fetched_at.as_str(),
        ]
    }
}

/// A single review attached to a business
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub business_id: String,
    pub review_id: String,
    pub reviewer: String,
    pub rating: String,
    pub date: String,
    pub text: String,
}

impl TabularRecord for ReviewRecord {
    const HEADERS: &'static [&'static str] =
        &["business_id", "review_id", "reviewer", "rating", "date", "text"];

    fn row(&self) -> Vec<&str> {
        vec![
            self.business_id.as_str(),
            self.review_id.as_str(),
            self.reviewer.as_str(),
            self.rating.as_str(),
            self.date.as_str(),
            self.text.as_str(),
        ]
    }
}

/// A content photo attached to a business
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRecord {
    pub business_id: String,
    pub photo_url: String,
}

impl TabularRecord for PhotoRecord {
    const HEADERS: &'static [&'static str] = &["business_id", "photo_url"];

    fn row(&self) -> Vec<&str> {
        vec![self.business_id.as_str(), self.photo_url.as_str()]
    }
}

/// Everything collected during one run, in scrape order
#[derive(Debug, Clone, Default)]
pub struct ScrapeOutput {
    pub businesses: Vec<BusinessRecord>,
    pub reviews: Vec<ReviewRecord>,
    pub photos: Vec<PhotoRecord>,
}
