//! Calendar date and time-of-day helpers.
//!
//! Dates are held as [`NaiveDate`] values internally and only rendered to display strings at
//! the presentation boundary. Appointment times keep their display form (`09:30 AM`) and are
//! parsed on demand; parsing never panics and reports failure as `None`.

use crate::constants::{DISPLAY_DATE_FORMAT, DISPLAY_TIME_FORMAT, SHORT_DATE_FORMAT};
use chrono::{NaiveDate, NaiveTime, Timelike};

const TIME_FORMATS: [&str; 3] = [DISPLAY_TIME_FORMAT, "%I:%M%p", "%H:%M"];

/// Render a date as `October 17, 2026`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Render a date as `Oct 17, 2026`.
pub fn format_short_date(date: NaiveDate) -> String {
    date.format(SHORT_DATE_FORMAT).to_string()
}

/// Parse a date in ISO (`2026-10-17`), long display (`October 17, 2026`) or short display
/// (`Oct 17, 2026`) form.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    ["%Y-%m-%d", DISPLAY_DATE_FORMAT, SHORT_DATE_FORMAT]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

/// Parse a time of day written as `09:30 AM`, `9:30pm` or 24-hour `14:15`.
pub fn parse_time_of_day(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(input, fmt).ok())
}

/// Render a time of day as `02:15 PM`.
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format(DISPLAY_TIME_FORMAT).to_string()
}

/// Minutes since midnight, 24-hour normalised.
pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}
