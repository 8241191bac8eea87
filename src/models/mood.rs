use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;

/// One of the five mood levels a day can be logged with.
///
/// Variant order is the display order (best first); `ordinal` carries the
/// numeric weight used for averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Ok,
    NotGood,
    Bad,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Great, Mood::Good, Mood::Ok, Mood::NotGood, Mood::Bad];
    pub const TOP: Mood = Mood::Great;
    pub const LOWEST: Mood = Mood::Bad;

    pub fn ordinal(self) -> u32 {
        match self {
            Mood::Great => 5,
            Mood::Good => 4,
            Mood::Ok => 3,
            Mood::NotGood => 2,
            Mood::Bad => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Great => "Great",
            Mood::Good => "Good",
            Mood::Ok => "Ok",
            Mood::NotGood => "Not Good",
            Mood::Bad => "Bad",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Mood::Great => "#22c55e",
            Mood::Good => "#3b82f6",
            Mood::Ok => "#eab308",
            Mood::NotGood => "#f97316",
            Mood::Bad => "#ef4444",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Ok => "ok",
            Mood::NotGood => "notgood",
            Mood::Bad => "bad",
        }
    }

    pub fn is_top(self) -> bool {
        self == Mood::TOP
    }

    /// One of the two lowest levels.
    pub fn is_low(self) -> bool {
        matches!(self, Mood::NotGood | Mood::Bad)
    }

    /// Nearest level for an averaged ordinal.
    pub fn from_average(avg: f64) -> Mood {
        if avg >= 4.5 {
            Mood::Great
        } else if avg >= 3.5 {
            Mood::Good
        } else if avg >= 2.5 {
            Mood::Ok
        } else if avg >= 1.5 {
            Mood::NotGood
        } else {
            Mood::Bad
        }
    }
}

/// A single day's log. `mood` is always set by `save_entry`; stored data
/// written by older builds may still carry `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub mood: Option<Mood>,
    #[serde(default)]
    pub note: String,
}

impl Entry {
    pub fn new(mood: Mood, note: impl Into<String>) -> Self {
        Self {
            mood: Some(mood),
            note: note.into(),
        }
    }

    pub fn is_logged(&self) -> bool {
        self.mood.is_some()
    }

    pub fn has_note(&self) -> bool {
        !self.note.trim().is_empty()
    }
}

/// Sparse day-keyed history. At most one entry per day; iteration is in
/// ascending key order.
pub type EntryHistory = BTreeMap<DateKey, Entry>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedEntry {
    pub date: DateKey,
    pub entry: Entry,
}

pub fn is_logged_on(history: &EntryHistory, date: DateKey) -> bool {
    history.get(&date).is_some_and(Entry::is_logged)
}

pub fn mood_on(history: &EntryHistory, date: DateKey) -> Option<Mood> {
    history.get(&date).and_then(|e| e.mood)
}
