use crate::models::mood::{DatedEntry, EntryHistory};

/// Queries shorter than this, in characters after trimming, return nothing.
pub const MIN_QUERY_LEN: usize = 2;

/// Entries whose mood label or note contains `query`, case-insensitively,
/// most recent first.
pub fn search_entries(history: &EntryHistory, query: &str) -> Vec<DatedEntry> {
    let needle = query.to_lowercase();

    history
        .iter()
        .rev()
        .filter(|(_, entry)| {
            let label_hit = entry
                .mood
                .is_some_and(|mood| mood.label().to_lowercase().contains(&needle));
            label_hit || entry.note.to_lowercase().contains(&needle)
        })
        .map(|(date, entry)| DatedEntry {
            date: *date,
            entry: entry.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_key::DateKey;
    use crate::models::mood::{Entry, Mood};

    fn key(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    fn sample() -> EntryHistory {
        let mut history = EntryHistory::new();
        history.insert(key("2024-01-01"), Entry::new(Mood::Great, "new year"));
        history.insert(key("2024-01-02"), Entry::new(Mood::Good, "a GREAT walk"));
        history.insert(key("2024-01-03"), Entry::new(Mood::Great, ""));
        history.insert(key("2024-01-04"), Entry::new(Mood::NotGood, "rain"));
        history
    }

    #[test]
    fn test_matches_label_or_note_newest_first() {
        let hits = search_entries(&sample(), "great");
        let dates: Vec<String> = hits.iter().map(|h| h.date.to_string()).collect();
        assert_eq!(dates, ["2024-01-03", "2024-01-02", "2024-01-01"]);
    }

    #[test]
    fn test_label_with_space() {
        let hits = search_entries(&sample(), "not g");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.mood, Some(Mood::NotGood));
    }

    #[test]
    fn test_no_match() {
        assert!(search_entries(&sample(), "snow").is_empty());
    }
}
