pub mod browser;
pub mod collectors;
pub mod detail;
pub mod extract;
pub mod scroll;
pub mod selectors;
pub mod session;
pub mod snapshot;
pub mod traits;
pub mod types;

pub use browser::ChromeMapPage;
pub use session::{MapsSession, SessionState};
pub use snapshot::SnapshotPage;
pub use traits::MapPage;
pub use types::{Locator, Reading, ScrapeConfig, SearchParams};
