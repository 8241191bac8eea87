use crate::date_key::DateKey;
use crate::models::mood::{is_logged_on, mood_on, EntryHistory, Mood};
use crate::models::streak::StreakData;

/// Current and longest logging streak, total logged days and the most recent
/// logged day. Only entries with a mood count as logged.
pub fn calculate_streak(history: &EntryHistory, today: DateKey) -> StreakData {
    let logged: Vec<DateKey> = history
        .iter()
        .filter(|(_, entry)| entry.is_logged())
        .map(|(date, _)| *date)
        .collect();

    if logged.is_empty() {
        return StreakData::default();
    }

    // An unlogged today does not break yesterday's streak
    let mut cursor = if is_logged_on(history, today) {
        Some(today)
    } else {
        today.pred()
    };
    let mut current = 0u32;
    while let Some(day) = cursor.filter(|day| is_logged_on(history, *day)) {
        current += 1;
        cursor = day.pred();
    }

    StreakData {
        current,
        longest: longest_run(logged.iter().copied()),
        total_days: logged.len() as u32,
        last_logged_date: logged.last().copied(),
    }
}

/// Longest run of calendar-adjacent days in an ascending sequence.
pub fn longest_run(dates: impl IntoIterator<Item = DateKey>) -> u32 {
    longest_run_by(dates, 1)
}

/// Longest run where consecutive items are exactly `step` days apart.
/// Input must be ascending; duplicates are ignored.
pub fn longest_run_by(dates: impl IntoIterator<Item = DateKey>, step: i64) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<DateKey> = None;

    for date in dates {
        match prev {
            Some(p) if p == date => continue,
            Some(p) if p.days_until(date) == step => run += 1,
            _ => {
                longest = longest.max(run);
                run = 1;
            }
        }
        prev = Some(date);
    }

    longest.max(run)
}

/// True when the most recent logged day and the `days - 1` calendar days
/// before it are all logged as `mood`.
pub fn trailing_run_of(history: &EntryHistory, mood: Mood, days: u32) -> bool {
    let Some(latest) = history
        .iter()
        .rev()
        .find(|(_, entry)| entry.is_logged())
        .map(|(date, _)| *date)
    else {
        return false;
    };

    (0..days as i64).all(|back| {
        latest
            .add_days(-back)
            .and_then(|day| mood_on(history, day))
            == Some(mood)
    })
}

/// Count of entries carrying a non-blank note.
pub fn note_count(history: &EntryHistory) -> u32 {
    history.values().filter(|entry| entry.has_note()).count() as u32
}
