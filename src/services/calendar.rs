//! Day grids for the week, month and year screens.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::date_key::{DateKey, DateKeyError};
use crate::models::mood::{DatedEntry, Entry, EntryHistory, Mood};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: DateKey,
    pub entry: Option<Entry>,
    pub is_today: bool,
    pub is_future: bool,
}

impl DayCell {
    fn new(history: &EntryHistory, date: DateKey, today: DateKey) -> Self {
        Self {
            date,
            entry: history.get(&date).cloned(),
            is_today: date == today,
            is_future: date > today,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st in a Sunday-first grid.
    pub leading_blanks: usize,
    pub days: Vec<DayCell>,
    pub mood_counts: BTreeMap<Mood, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearView {
    pub year: i32,
    pub leading_blanks: usize,
    pub days: Vec<DayCell>,
}

/// The Sunday-first week containing `anchor`. Days outside the key range
/// are left out, so the first and last weeks of the range are short.
pub fn week_view(history: &EntryHistory, anchor: DateKey, today: DateKey) -> Vec<DayCell> {
    let back = anchor.weekday_index() as i64;
    (0..7)
        .filter_map(|offset| anchor.add_days(offset - back))
        .map(|date| DayCell::new(history, date, today))
        .collect()
}

pub fn month_view(
    history: &EntryHistory,
    year: i32,
    month: u32,
    today: DateKey,
) -> Result<MonthView, DateKeyError> {
    let first = first_key(year, month, || format!("{year:04}-{month:02}"))?;
    let days = cells_while(history, first, today, |d| d.month() == month);

    let mut mood_counts: BTreeMap<Mood, u32> = Mood::ALL.iter().map(|m| (*m, 0)).collect();
    for mood in days.iter().filter_map(|cell| cell.entry.as_ref()?.mood) {
        *mood_counts.entry(mood).or_insert(0) += 1;
    }

    Ok(MonthView {
        year,
        month,
        leading_blanks: first.weekday_index(),
        days,
        mood_counts,
    })
}

pub fn year_view(history: &EntryHistory, year: i32, today: DateKey) -> Result<YearView, DateKeyError> {
    let first = first_key(year, 1, || format!("{year:04}"))?;

    Ok(YearView {
        year,
        leading_blanks: first.weekday_index(),
        days: cells_while(history, first, today, |d| d.year() == year),
    })
}

/// Most recent entries first, at most `limit`.
pub fn recent_entries(history: &EntryHistory, limit: usize) -> Vec<DatedEntry> {
    history
        .iter()
        .rev()
        .filter(|(_, entry)| entry.is_logged())
        .take(limit)
        .map(|(date, entry)| DatedEntry {
            date: *date,
            entry: entry.clone(),
        })
        .collect()
}

/// First day of the month as a key; rejects impossible months and years
/// outside the key range.
fn first_key(year: i32, month: u32, label: impl Fn() -> String) -> Result<DateKey, DateKeyError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| DateKey::from_date(date).ok())
        .ok_or_else(|| DateKeyError::InvalidKey(label()))
}

fn cells_while(
    history: &EntryHistory,
    start: DateKey,
    today: DateKey,
    keep: impl Fn(NaiveDate) -> bool,
) -> Vec<DayCell> {
    let mut cells = Vec::new();
    let mut cursor = Some(start);
    while let Some(date) = cursor.filter(|date| keep(date.date())) {
        cells.push(DayCell::new(history, date, today));
        cursor = date.add_days(1);
    }
    cells
}
