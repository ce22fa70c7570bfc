use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

use crate::{
    calendar::{CalendarKey, validate},
    directory_lister::list_hashes,
    error::CrawlError,
    lecture_descriptor::{LectureRecord, fetch_lecture},
    page_renderer::{PageRenderer, is_page_name},
    scraping_context::CrawlContext,
};

/// What happened to one day's directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DayReport {
    /// Descriptors that parsed.
    pub lectures_found: usize,
    pub lectures_appended: usize,
    /// Lectures whose unit has no page, or whose code can't name one.
    pub lectures_dropped: usize,
    /// Hashes without a readable descriptor (cancelled or failed recordings included).
    pub descriptors_skipped: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WeekReport {
    pub days_crawled: usize,
    /// Days whose listing couldn't be fetched, usually because they haven't happened yet.
    pub days_skipped: usize,
    pub lectures_found: usize,
    pub lectures_appended: usize,
    pub lectures_dropped: usize,
    pub descriptors_skipped: usize,
}

impl WeekReport {
    fn add_day(&mut self, day: DayReport) {
        self.days_crawled += 1;
        self.lectures_found += day.lectures_found;
        self.lectures_appended += day.lectures_appended;
        self.lectures_dropped += day.lectures_dropped;
        self.descriptors_skipped += day.descriptors_skipped;
    }
}

/// Appends every lecture recorded on `key`'s day to its unit's page, if the
/// unit has one.
///
/// Fails if the day listing can't be fetched or a page can't be written.
/// Lectures are appended in start-time order.
pub async fn crawl_day(
    ctx: &CrawlContext,
    renderer: &PageRenderer,
    key: &CalendarKey,
) -> Result<DayReport, CrawlError> {
    info!("fetching {key}");
    let listing_url = ctx.crawl_config.day_listing_url(key);
    let hashes = list_hashes(ctx, &listing_url).await?;

    let results: Vec<_> = stream::iter(&hashes)
        .map(|hash| fetch_lecture(ctx, key, hash))
        .buffer_unordered(ctx.crawl_config.concurrency())
        .collect()
        .await;

    let mut report = DayReport::default();
    let mut lectures: Vec<LectureRecord> = Vec::new();
    for result in results {
        match result {
            Ok(lecture) => lectures.push(lecture),
            Err(e) if e.is_not_found() => {
                debug!("no recording: {e}");
                report.descriptors_skipped += 1;
            }
            Err(e) => {
                warn!("skipping lecture: {e}");
                report.descriptors_skipped += 1;
            }
        }
    }
    report.lectures_found = lectures.len();

    lectures.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then_with(|| a.video_url.cmp(&b.video_url))
    });

    for lecture in &lectures {
        if !is_page_name(&lecture.unit_code) {
            warn!("dropping {}: unusable unit code {:?}", lecture.video_url, lecture.unit_code);
            report.lectures_dropped += 1;
        } else if renderer.unit_page_exists(&lecture.unit_code).await {
            renderer.append_lecture(&lecture.unit_code, lecture).await?;
            report.lectures_appended += 1;
        } else {
            report.lectures_dropped += 1;
        }
    }

    Ok(report)
}

/// Runs [`crawl_day`] for Monday through Sunday of `week` in `year` (two digits).
///
/// Unit pages have to exist before this runs; lectures of units without one are
/// dropped. Running it twice for the same week appends every lecture twice.
pub async fn crawl_week(
    ctx: &CrawlContext,
    renderer: &PageRenderer,
    year: u32,
    week: u32,
) -> Result<WeekReport, CrawlError> {
    validate(year, week, 1)?;
    info!("Fetching /{year:02}{week:02}/");

    let mut report = WeekReport::default();
    for day in 1..=7 {
        let key = CalendarKey::new(year, week, day)?;
        match crawl_day(ctx, renderer, &key).await {
            Ok(day_report) => report.add_day(day_report),
            Err(e @ CrawlError::Fetch { .. }) => {
                warn!("skipping day {day}: {e}");
                report.days_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Week {year:02}{week:02}: {} lectures found, {} appended, {} without a unit page",
        report.lectures_found, report.lectures_appended, report.lectures_dropped
    );
    Ok(report)
}
