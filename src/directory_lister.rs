use std::fmt;

use crate::{error::CrawlError, scraping_context::CrawlContext};

const ANCHOR_OPEN: &str = "<a href=\"";
const HASH_LEN: usize = 36;
// The text before the first anchor, then the listing's name/date/size/description
// sort links and "Parent Directory".
const BOILERPLATE_FRAGMENTS: usize = 6;

/// Opaque 36-character directory name the media server gives every unit and
/// lecture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashId(String);

impl HashId {
    /// Accepts exactly 36 hex digits and dashes.
    pub fn parse(s: &str) -> Option<Self> {
        let well_formed = s.len() == HASH_LEN
            && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-');
        well_formed.then(|| HashId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pulls the hash directories out of a server directory listing.
pub fn extract_hashes(listing: &str) -> Vec<HashId> {
    listing
        .split(ANCHOR_OPEN)
        .skip(BOILERPLATE_FRAGMENTS)
        .filter_map(|fragment| fragment.get(..HASH_LEN))
        .filter_map(HashId::parse)
        .collect()
}

/// Fetches a directory listing and returns every hash directory in it.
pub async fn list_hashes(ctx: &CrawlContext, url: &str) -> Result<Vec<HashId>, CrawlError> {
    let body = ctx.request_client.fetch_url_body(url).await?;
    Ok(extract_hashes(&body))
}
