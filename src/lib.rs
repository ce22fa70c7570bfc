mod ratelimit;
mod requests;
mod text_manipulators;

pub mod calendar;
pub mod config;
pub mod directory_lister;
pub mod error;
pub mod lecture_crawler;
pub mod lecture_descriptor;
pub mod page_renderer;
pub mod scraping_context;
pub mod semester_crawler;
pub mod unit_descriptor;

pub use calendar::CalendarKey;
pub use config::{CrawlConfig, OutputConfig};
pub use directory_lister::HashId;
pub use error::CrawlError;
pub use lecture_crawler::{DayReport, WeekReport, crawl_day, crawl_week};
pub use lecture_descriptor::LectureRecord;
pub use page_renderer::{PageRenderer, Templates};
pub use scraping_context::CrawlContext;
pub use semester_crawler::{crawl_semester, publish_semester};
pub use unit_descriptor::UnitRecord;
