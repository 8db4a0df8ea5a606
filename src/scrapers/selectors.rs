//! Fixed DOM targets in the map application's UI

pub const SEARCH_INPUT: &str = "input[aria-label='Search Google Maps']";
pub const RESULT_FEED: &str = "div[role='feed']";
pub const RESULT_CARD: &str = "div[role='article']";

pub const BUSINESS_NAME: &str = "h1";
pub const ADDRESS: &str = "button[data-item-id='address']";
pub const PHONE: &str = "button[data-item-id='phone']";
pub const WEBSITE: &str = "a[data-item-id='authority']";
pub const CATEGORY: &str = "button[jsaction='pane.rating.category']";
pub const STAR_RATING: &str = "div[role='img'][aria-label*='stars']";
pub const MORE_REVIEWS: &str = "button[jsaction='pane.rating.moreReviews']";
pub const HOURS: &str = "div[aria-label*='Hours']";

pub const MAIN_PANEL: &str = "div[role='main']";
pub const REVIEWS_TOGGLE: &str = "button[aria-label*='reviews']";
pub const PHOTOS_TOGGLE: &str = "button[aria-label*='photos']";

pub const REVIEW_NODE: &str = "div[data-review-id]";
pub const REVIEW_ID_ATTR: &str = "data-review-id";
pub const REVIEWER: &str = ".d4r55";
pub const REVIEW_RATING: &str = "span[role='img']";
pub const REVIEW_DATE: &str = ".rsqaWe";
pub const REVIEW_TEXT: &str = ".MyEned";

pub const PHOTO_IMAGE: &str = "img[src^='https://']";
