use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while crawling the media server or writing pages.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// A calendar value outside the range the media server publishes.
    #[error("{field} argument out of range: {value} (valid: {min}-{max})")]
    Range {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Network failure or a non-2xx response.
    #[error("failed to fetch {url}: {reason}")]
    Fetch {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// A descriptor that doesn't have the expected shape.
    #[error("malformed descriptor: {0}")]
    Parse(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CrawlError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CrawlError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the server answered 404, i.e. the resource simply isn't there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CrawlError::Fetch { status: Some(404), .. })
    }
}
