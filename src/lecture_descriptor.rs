use chrono::{Duration, NaiveDateTime};
use roxmltree::Document;

use crate::{
    calendar::CalendarKey,
    directory_lister::HashId,
    error::CrawlError,
    scraping_context::CrawlContext,
    unit_descriptor::child_text,
};

const DESCRIPTOR_FILE: &str = "presentation.xml";
const VIDEO_FILE: &str = "audio-vga.m4v";
const TIMESTAMP_FORMAT: &str = "%d-%b-%Y %H:%M:%S";
const UNIT_CODE_LEN: usize = 8;

/// Recordings start two minutes before the timetabled class.
pub const RECORDING_LEAD_MINUTES: i64 = 2;

/// One recorded lecture, as described by its `presentation.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureRecord {
    pub unit_code: String,
    pub video_url: String,
    /// Timetabled start, in the media server's local time.
    pub start_time: NaiveDateTime,
    pub location: String,
}

impl LectureRecord {
    /// Hour and weekday, e.g. "9AM Monday".
    pub fn time_label(&self) -> String {
        self.start_time.format("%-I%p %A").to_string()
    }

    /// e.g. "29 July 2015".
    pub fn date_label(&self) -> String {
        self.start_time.format("%d %B %Y").to_string()
    }
}

/// Parses a descriptor living in the lecture directory `dir_url`.
pub fn parse_lecture_descriptor(xml: &str, dir_url: &str) -> Result<LectureRecord, CrawlError> {
    let document = Document::parse(xml).map_err(|e| CrawlError::Parse(e.to_string()))?;
    let root = document.root_element();

    // Lecture names start with the owning unit's code.
    let name = child_text(root, &["presentation-properties", "name"])?;
    let unit_code: String = name.chars().take(UNIT_CODE_LEN).collect();

    let raw_start = child_text(root, &["presentation-properties", "start-timestamp"])?;
    let start_time = NaiveDateTime::parse_from_str(raw_start.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| CrawlError::Parse(format!("bad start-timestamp {raw_start:?}: {e}")))?
        + Duration::minutes(RECORDING_LEAD_MINUTES);

    let location = child_text(root, &["presentation-properties", "location"])?.to_string();

    Ok(LectureRecord {
        unit_code,
        video_url: format!("{dir_url}{VIDEO_FILE}"),
        start_time,
        location,
    })
}

/// Fetches and parses `{yyww}/{d}/{hash}/presentation.xml`.
pub async fn fetch_lecture(
    ctx: &CrawlContext,
    key: &CalendarKey,
    hash: &HashId,
) -> Result<LectureRecord, CrawlError> {
    let dir_url = ctx.crawl_config.lecture_dir_url(key, hash);
    let xml = ctx
        .request_client
        .fetch_url_body(&format!("{dir_url}{DESCRIPTOR_FILE}"))
        .await?;
    parse_lecture_descriptor(&xml, &dir_url).map_err(|e| match e {
        CrawlError::Parse(reason) => CrawlError::Parse(format!("{dir_url}: {reason}")),
        other => other,
    })
}
