//! Month view over the mood log.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::entries::{date_key, MoodEntries, MoodScore};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    pub day: u32,
    pub date: String,
    pub mood: Option<MoodScore>,
    pub is_today: bool,
    /// Future days cannot be logged.
    pub is_future: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// e.g. "January 2026"
    pub title: String,
    /// Empty cells before day 1 in a Monday-first week.
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

impl MonthGrid {
    /// # Errors
    /// Returns [`ValidationError::InvalidDate`] for a month outside 1..=12
    /// or a year chrono cannot represent.
    pub fn new(year: i32, month: u32, today: NaiveDate, entries: &MoodEntries) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate(format!("{year:04}-{month:02}"));
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;

        let days = first
            .iter_days()
            .take_while(|d| *d < next)
            .map(|date| DayCell {
                day: date.day(),
                date: date_key(date),
                mood: entries.get(date),
                is_today: date == today,
                is_future: date > today,
            })
            .collect();

        Ok(Self {
            year,
            month,
            title: first.format("%B %Y").to_string(),
            leading_blanks: first.weekday().num_days_from_monday(),
            days,
        })
    }

    /// The month containing `today`.
    pub fn current(today: NaiveDate, entries: &MoodEntries) -> Self {
        // today's own year and month are always representable
        match Self::new(today.year(), today.month(), today, entries) {
            Ok(grid) => grid,
            Err(_) => unreachable!("month of a valid date"),
        }
    }

    /// Days with a logged mood.
    pub fn logged_days(&self) -> usize {
        self.days.iter().filter(|d| d.mood.is_some()).count()
    }
}

/// Parse `yyyy-MM` into `(year, month)`.
///
/// # Errors
/// Returns [`ValidationError::InvalidDate`] on any other shape.
pub fn parse_month(s: &str) -> Result<(i32, u32), ValidationError> {
    let invalid = || ValidationError::InvalidDate(s.to_string());
    let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month: u32 = m.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
