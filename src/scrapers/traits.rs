use crate::scrapers::types::{Locator, Reading};
use anyhow::Result;

/// The browser surface the pipeline drives.
///
/// Lookups never wait: `probe` answers `Ok(None)` when the element is not in the
/// page right now. Bounded waiting is layered on top by the field extractor.
/// `Err` is reserved for failures of the browser itself.
pub trait MapPage {
    fn navigate(&mut self, url: &str) -> Result<()>;

    fn current_url(&self) -> Result<String>;

    /// Focus the input, type `text` and press Enter
    fn submit_search(&mut self, input: &Locator, text: &str) -> Result<()>;

    /// Read text or an attribute of the located element, trimmed.
    /// A present element without the attribute reads as `Some("")`.
    fn probe(&self, locator: &Locator, reading: Reading) -> Result<Option<String>>;

    /// Number of elements matching the locator's selector within its scope
    fn count(&self, locator: &Locator) -> Result<usize>;

    /// Scrollable extent of a container
    fn scroll_extent(&self, container: &Locator) -> Result<u64>;

    fn scroll_to_end(&mut self, container: &Locator) -> Result<()>;

    /// Bring the element into view and click it
    fn click(&mut self, target: &Locator) -> Result<()>;

    /// Leave the current detail view
    fn dismiss(&mut self) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}
