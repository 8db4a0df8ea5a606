pub mod models;
pub mod scrapers;
pub mod writer;
