use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use nonzero_ext::nonzero;
use regex::Regex;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{calendar::CalendarKey, directory_lister::HashId};

const DEFAULT_BASE_URL: &str = "http://media.lcs.uwa.edu.au/echocontent/";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_concurrency() -> usize {
    8
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_requests_per_sec() -> NonZeroU32 {
    nonzero!(20u32)
}

fn default_request_gap_ms() -> u64 {
    20
}

/// The env vars needed for crawling.
#[derive(Debug, Deserialize)]
pub struct CrawlEnv {
    #[serde(default = "default_base_url")]
    echo_base_url: String,
    #[serde(default = "default_concurrency")]
    crawl_concurrency: usize,
    #[serde(default = "default_timeout_secs")]
    request_timeout_secs: u64,
    #[serde(default = "default_requests_per_sec")]
    requests_per_sec: NonZeroU32,
    #[serde(default = "default_request_gap_ms")]
    request_gap_ms: u64,
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    base_url: String,
    concurrency: usize,
    request_timeout: Duration,
    requests_per_sec: NonZeroU32,
    request_gap: Duration,
}

impl CrawlConfig {
    pub fn new() -> anyhow::Result<Self> {
        let crawl_env = CrawlEnv::load_from_env()?;
        Ok(Self {
            base_url: normalise_base_url(&crawl_env.echo_base_url),
            concurrency: crawl_env.crawl_concurrency.max(1),
            request_timeout: Duration::from_secs(crawl_env.request_timeout_secs),
            requests_per_sec: crawl_env.requests_per_sec,
            request_gap: Duration::from_millis(crawl_env.request_gap_ms),
        })
    }

    /// Config pointing at an arbitrary server, with default limits.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalise_base_url(base_url),
            concurrency: default_concurrency(),
            request_timeout: Duration::from_secs(default_timeout_secs()),
            requests_per_sec: default_requests_per_sec(),
            request_gap: Duration::from_millis(default_request_gap_ms()),
        }
    }

    pub fn set_base_url(&mut self, base_url: &str) {
        self.base_url = normalise_base_url(base_url);
    }

    pub fn set_concurrency(&mut self, concurrency: usize) {
        self.concurrency = concurrency.max(1);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn requests_per_sec(&self) -> NonZeroU32 {
        self.requests_per_sec
    }

    /// Minimum time between two requests; zero disables the gap.
    pub fn request_gap(&self) -> Duration {
        self.request_gap
    }

    pub fn sections_url(&self) -> String {
        format!("{}sections/", self.base_url)
    }

    pub fn unit_descriptor_url(&self, hash: &HashId) -> String {
        format!("{}sections/{}/section.xml", self.base_url, hash)
    }

    pub fn day_listing_url(&self, key: &CalendarKey) -> String {
        format!("{}{}", self.base_url, key.dir_path())
    }

    /// Directory holding one lecture's descriptor and media, with trailing slash.
    pub fn lecture_dir_url(&self, key: &CalendarKey, hash: &HashId) -> String {
        format!("{}{}{}/", self.base_url, key.dir_path(), hash)
    }
}

fn normalise_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

pub struct UnitCodeFilter {
    // Codes of real units: four letters then four digits. Anything else is an
    // administrative or non-award offering.
    unit_code_regex: Regex,
}

impl UnitCodeFilter {
    pub fn new() -> anyhow::Result<Self> {
        let unit_code_regex = Regex::new(r"^[A-Za-z]{4}[0-9]{4}")?;
        Ok(Self { unit_code_regex })
    }

    pub fn is_unit_code(&self, code: &str) -> bool {
        self.unit_code_regex.is_match(code)
    }
}

/// Where templates are read from and pages are written to.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub unit_list_file: PathBuf,
    pub unit_list_template: PathBuf,
    pub unit_template: PathBuf,
    pub unit_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            unit_list_file: PathBuf::from("unitList.html"),
            unit_list_template: PathBuf::from("unitListTemplate.html"),
            unit_template: PathBuf::from("unitTemplate.html"),
            unit_dir: PathBuf::from("units"),
        }
    }
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env() -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config =
            envy::from_env::<Self>().context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}
