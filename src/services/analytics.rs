use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::mood::{EntryHistory, Mood};
use crate::services::streak::note_count;

/// Sum of mood ordinals and number of logged days for one weekday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeekdayTotals {
    pub total: u32,
    pub count: u32,
}

impl WeekdayTotals {
    /// `None` when nothing was logged on this weekday.
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total as f64 / self.count as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    /// Always holds all five levels.
    pub mood_counts: BTreeMap<Mood, u32>,
    /// Indexed 0 = Sunday .. 6 = Saturday.
    pub day_of_week: [WeekdayTotals; 7],
    pub total_notes: u32,
}

impl Analytics {
    pub fn logged_days(&self) -> u32 {
        self.mood_counts.values().sum()
    }

    /// Share of `mood` among logged days, rounded to a whole percent.
    pub fn percentage(&self, mood: Mood) -> u32 {
        let total = self.logged_days();
        if total == 0 {
            return 0;
        }
        let count = self.mood_counts.get(&mood).copied().unwrap_or(0);
        (count as f64 * 100.0 / total as f64).round() as u32
    }
}

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn compute_analytics(history: &EntryHistory) -> Analytics {
    let mut mood_counts: BTreeMap<Mood, u32> = Mood::ALL.iter().map(|m| (*m, 0)).collect();
    let mut day_of_week = [WeekdayTotals::default(); 7];

    for (date, entry) in history {
        let Some(mood) = entry.mood else { continue };
        *mood_counts.entry(mood).or_insert(0) += 1;
        let slot = &mut day_of_week[date.weekday_index()];
        slot.total += mood.ordinal();
        slot.count += 1;
    }

    Analytics {
        mood_counts,
        day_of_week,
        total_notes: note_count(history),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_key::DateKey;
    use crate::models::mood::Entry;

    fn key(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    #[test]
    fn test_empty_history_has_all_levels() {
        let analytics = compute_analytics(&EntryHistory::new());
        assert_eq!(analytics.mood_counts.len(), 5);
        assert!(analytics.mood_counts.values().all(|c| *c == 0));
        assert!(analytics.day_of_week.iter().all(|d| d.average().is_none()));
        assert_eq!(analytics.percentage(Mood::Great), 0);
    }

    #[test]
    fn test_weekday_aggregation() {
        let mut history = EntryHistory::new();
        // 2024-03-03 and 2024-03-10 are Sundays, 2024-03-04 is a Monday
        history.insert(key("2024-03-03"), Entry::new(Mood::Great, ""));
        history.insert(key("2024-03-10"), Entry::new(Mood::Ok, "tired"));
        history.insert(key("2024-03-04"), Entry::new(Mood::Bad, ""));
        history.insert(
            key("2024-03-05"),
            Entry {
                mood: None,
                note: "unsaved".into(),
            },
        );

        let analytics = compute_analytics(&history);
        assert_eq!(analytics.day_of_week[0], WeekdayTotals { total: 8, count: 2 });
        assert_eq!(analytics.day_of_week[0].average(), Some(4.0));
        assert_eq!(analytics.day_of_week[1].average(), Some(1.0));
        assert_eq!(analytics.day_of_week[2].average(), None);
        assert_eq!(analytics.mood_counts[&Mood::Great], 1);
        assert_eq!(analytics.logged_days(), 3);
        assert_eq!(analytics.total_notes, 2);
    }

    #[test]
    fn test_percentage_rounds() {
        let mut history = EntryHistory::new();
        history.insert(key("2024-01-01"), Entry::new(Mood::Good, ""));
        history.insert(key("2024-01-02"), Entry::new(Mood::Good, ""));
        history.insert(key("2024-01-03"), Entry::new(Mood::Bad, ""));
        let analytics = compute_analytics(&history);
        assert_eq!(analytics.percentage(Mood::Good), 67);
        assert_eq!(analytics.percentage(Mood::Bad), 33);
        assert_eq!(analytics.percentage(Mood::Ok), 0);
    }
}
