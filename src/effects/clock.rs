//! Header clock text, refreshed once a second

use chrono::{Datelike, Local, NaiveDate, Timelike};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockLine {
    pub time: String,
    pub date: String,
}

impl ClockLine {
    pub fn at<T: Timelike + Datelike>(now: &T) -> Self {
        let date = NaiveDate::from_ymd_opt(now.year(), now.month(), now.day());
        Self {
            time: clock_text(now),
            date: date.map(|d| date_text(&d)).unwrap_or_default(),
        }
    }

    pub fn now() -> Self {
        Self::at(&Local::now())
    }
}

/// `HH:MM:SS`, 24-hour
pub fn clock_text<T: Timelike>(t: &T) -> String {
    format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
}

/// e.g. `Thursday, October 15, 2026`
pub fn date_text(d: &NaiveDate) -> String {
    d.format("%A, %B %-d, %Y").to_string()
}
