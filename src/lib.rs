pub mod api_source;
pub mod batch;
pub mod classifier;
pub mod config;
pub mod fake_feed;
pub mod feed;
pub mod http_client;
pub mod logging;
pub mod normalize;
pub mod record;
pub mod report;
pub mod scrape_source;
pub mod source;
pub mod state;
