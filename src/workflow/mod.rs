pub mod scrape_flow;
pub mod site_ctx;

pub use scrape_flow::{ProcessResult, ScrapeFlow, SiteOutcome};
pub use site_ctx::SiteCtx;
