use crate::{
    config::{CrawlConfig, UnitCodeFilter},
    requests::RequestClient,
};

/// Shared state for one crawl run: where the media server lives and the
/// rate-limited client used to reach it.
pub struct CrawlContext {
    pub crawl_config: CrawlConfig,
    pub unit_code_filter: UnitCodeFilter,
    pub request_client: RequestClient,
}

impl CrawlContext {
    pub fn new(crawl_config: CrawlConfig) -> anyhow::Result<Self> {
        let unit_code_filter = UnitCodeFilter::new()?;
        let request_client = RequestClient::new(&crawl_config)?;
        Ok(CrawlContext {
            crawl_config,
            unit_code_filter,
            request_client,
        })
    }
}
