use chrono::{Datelike, Local};

use crate::error::CrawlError;

/// First two-digit year the media server has recordings for.
pub const FIRST_YEAR: u32 = 15;

/// Two-digit form of the current calendar year.
pub fn current_short_year() -> u32 {
    (Local::now().year() % 100) as u32
}

/// Checks year, week and day are within the ranges the media server uses.
///
/// `year` is a two-digit year from 15 to the current year, `week` an ISO week
/// (1-53) and `day` an ISO weekday (1 = Monday, 7 = Sunday).
pub fn validate(year: u32, week: u32, day: u32) -> Result<(), CrawlError> {
    validate_with_max_year(year, week, day, current_short_year())
}

fn validate_with_max_year(year: u32, week: u32, day: u32, max_year: u32) -> Result<(), CrawlError> {
    check_range("Year", year, FIRST_YEAR, max_year)?;
    check_range("Week", week, 1, 53)?;
    check_range("Day", day, 1, 7)
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), CrawlError> {
    if value < min || value > max {
        return Err(CrawlError::Range {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// A validated (year, week, day) triple. The only way to get one is through
/// [`CalendarKey::new`], so every remote path built from it is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarKey {
    year: u32,
    week: u32,
    day: u32,
}

impl CalendarKey {
    pub fn new(year: u32, week: u32, day: u32) -> Result<Self, CrawlError> {
        validate(year, week, day)?;
        Ok(Self { year, week, day })
    }

    /// `yyww/d/`, the day directory relative to the server's base URL.
    pub fn dir_path(&self) -> String {
        format!("{:02}{:02}/{}/", self.year, self.week, self.day)
    }
}

impl std::fmt::Display for CalendarKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{:02}{:02}/{}", self.year, self.week, self.day)
    }
}
