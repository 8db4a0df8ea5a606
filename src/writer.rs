use crate::models::{ScrapeOutput, TabularRecord};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub const BUSINESSES_FILE: &str = "businesses.csv";
pub const REVIEWS_FILE: &str = "reviews.csv";
pub const PHOTOS_FILE: &str = "photos.csv";

/// Row counts of one `write_output` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub businesses: usize,
    pub reviews: usize,
    pub photos: usize,
}

/// Write a header row and one row per record, replacing any existing file
pub fn write_table<R: TabularRecord>(path: &Path, records: &[R]) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(R::HEADERS)?;
    for record in records {
        writer.write_record(record.row())?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), rows = records.len(), "Saved table");
    Ok(records.len())
}

/// Write all three tables into `dir`, which must already exist
pub fn write_output(dir: &Path, output: &ScrapeOutput) -> Result<WriteSummary> {
    Ok(WriteSummary {
        businesses: write_table(&dir.join(BUSINESSES_FILE), &output.businesses)?,
        reviews: write_table(&dir.join(REVIEWS_FILE), &output.reviews)?,
        photos: write_table(&dir.join(PHOTOS_FILE), &output.photos)?,
    })
}
