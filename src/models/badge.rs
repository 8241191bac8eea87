use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifiers of the shipped badge catalog. The serialized names are
/// persisted and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BadgeId {
    #[serde(rename = "first_entry")]
    FirstEntry,
    #[serde(rename = "days_100")]
    Days100,
    #[serde(rename = "notes_10")]
    Notes10,
    #[serde(rename = "notes_50")]
    Notes50,
    #[serde(rename = "streak_7")]
    Streak7,
    #[serde(rename = "streak_14")]
    Streak14,
    #[serde(rename = "streak_30")]
    Streak30,
    #[serde(rename = "streak_180")]
    Streak180,
    #[serde(rename = "streak_365")]
    Streak365,
    #[serde(rename = "great_week")]
    GreatWeek,
    #[serde(rename = "full_spectrum")]
    FullSpectrum,
    #[serde(rename = "comeback")]
    Comeback,
    #[serde(rename = "weekend_warrior")]
    WeekendWarrior,
    #[serde(rename = "early_bird")]
    EarlyBird,
    #[serde(rename = "night_owl")]
    NightOwl,
}

/// Display metadata for one catalog badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeDef {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// The catalog, in display order.
pub const CATALOG: &[BadgeDef] = &[
    BadgeDef {
        id: BadgeId::FirstEntry,
        name: "First Steps",
        description: "Log your very first mood",
        icon: "sprout",
    },
    BadgeDef {
        id: BadgeId::Streak7,
        name: "Week Warrior",
        description: "Keep a 7-day logging streak",
        icon: "flame",
    },
    BadgeDef {
        id: BadgeId::Streak14,
        name: "Fortnight Focus",
        description: "Keep a 14-day logging streak",
        icon: "flame",
    },
    BadgeDef {
        id: BadgeId::Streak30,
        name: "Monthly Master",
        description: "Keep a 30-day logging streak",
        icon: "trophy",
    },
    BadgeDef {
        id: BadgeId::Streak180,
        name: "Half-Year Hero",
        description: "Keep a 180-day logging streak",
        icon: "medal",
    },
    BadgeDef {
        id: BadgeId::Streak365,
        name: "Year of Reflection",
        description: "Keep a 365-day logging streak",
        icon: "crown",
    },
    BadgeDef {
        id: BadgeId::Days100,
        name: "Century",
        description: "Log 100 days in total",
        icon: "calendar-check",
    },
    BadgeDef {
        id: BadgeId::Notes10,
        name: "Storyteller",
        description: "Write notes on 10 days",
        icon: "pen-line",
    },
    BadgeDef {
        id: BadgeId::Notes50,
        name: "Memoirist",
        description: "Write notes on 50 days",
        icon: "book-open",
    },
    BadgeDef {
        id: BadgeId::GreatWeek,
        name: "Sunshine Streak",
        description: "Feel great 7 days in a row",
        icon: "sun",
    },
    BadgeDef {
        id: BadgeId::FullSpectrum,
        name: "Full Spectrum",
        description: "Log every mood level at least once",
        icon: "rainbow",
    },
    BadgeDef {
        id: BadgeId::Comeback,
        name: "Comeback",
        description: "Feel great right after three rough days",
        icon: "trending-up",
    },
    BadgeDef {
        id: BadgeId::WeekendWarrior,
        name: "Weekend Warrior",
        description: "Log on the weekend four weeks in a row",
        icon: "party-popper",
    },
    BadgeDef {
        id: BadgeId::EarlyBird,
        name: "Early Bird",
        description: "Log a new day early in the morning",
        icon: "sunrise",
    },
    BadgeDef {
        id: BadgeId::NightOwl,
        name: "Night Owl",
        description: "Log a new day late at night",
        icon: "moon",
    },
];

impl BadgeId {
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeId::FirstEntry => "first_entry",
            BadgeId::Days100 => "days_100",
            BadgeId::Notes10 => "notes_10",
            BadgeId::Notes50 => "notes_50",
            BadgeId::Streak7 => "streak_7",
            BadgeId::Streak14 => "streak_14",
            BadgeId::Streak30 => "streak_30",
            BadgeId::Streak180 => "streak_180",
            BadgeId::Streak365 => "streak_365",
            BadgeId::GreatWeek => "great_week",
            BadgeId::FullSpectrum => "full_spectrum",
            BadgeId::Comeback => "comeback",
            BadgeId::WeekendWarrior => "weekend_warrior",
            BadgeId::EarlyBird => "early_bird",
            BadgeId::NightOwl => "night_owl",
        }
    }
}

impl FromStr for BadgeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .map(|def| def.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown badge id '{s}'"))
    }
}

/// A catalog badge together with the user's unlock state. This is also the
/// persisted shape of one `user_badges` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: BadgeId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Badge {
    pub fn locked(def: &BadgeDef) -> Self {
        Self {
            id: def.id,
            name: def.name.to_string(),
            description: def.description.to_string(),
            icon: def.icon.to_string(),
            unlocked_at: None,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// Loose view of a persisted badge: only `id` and `unlockedAt` matter when
/// merging, and ids from other catalog versions must not fail the load.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBadge {
    pub id: String,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// Full catalog with unlock timestamps carried over from `stored` by id.
/// Display text always comes from the current catalog; stored ids that the
/// catalog no longer knows are dropped.
pub fn merge_catalog(stored: &[StoredBadge]) -> Vec<Badge> {
    let mut unlocked: HashMap<BadgeId, DateTime<Utc>> = HashMap::new();
    for badge in stored {
        match badge.id.parse::<BadgeId>() {
            Ok(id) => {
                if let Some(at) = badge.unlocked_at {
                    unlocked.entry(id).or_insert(at);
                }
            }
            Err(e) => tracing::debug!(error = %e, "Dropping stored badge not in catalog"),
        }
    }

    CATALOG
        .iter()
        .map(|def| {
            let mut badge = Badge::locked(def);
            badge.unlocked_at = unlocked.get(&def.id).copied();
            badge
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique_and_round_trip() {
        let mut seen = std::collections::HashSet::new();
        for def in CATALOG {
            assert!(seen.insert(def.id), "duplicate id {:?}", def.id);
            assert_eq!(def.id.as_str().parse::<BadgeId>(), Ok(def.id));
            assert_eq!(
                serde_json::to_string(&def.id).unwrap(),
                format!("\"{}\"", def.id.as_str())
            );
        }
    }

    #[test]
    fn test_merge_keeps_unlocks_and_adds_new_definitions() {
        let at: DateTime<Utc> = "2024-02-01T08:00:00Z".parse().unwrap();
        let stored = vec![
            StoredBadge {
                id: "first_entry".into(),
                unlocked_at: Some(at),
            },
            StoredBadge {
                id: "retired_badge".into(),
                unlocked_at: Some(at),
            },
        ];

        let merged = merge_catalog(&stored);
        assert_eq!(merged.len(), CATALOG.len());
        let first = merged.iter().find(|b| b.id == BadgeId::FirstEntry).unwrap();
        assert_eq!(first.unlocked_at, Some(at));
        assert_eq!(merged.iter().filter(|b| b.is_unlocked()).count(), 1);
    }

    #[test]
    fn test_persisted_shape() {
        let night_owl = CATALOG.iter().find(|def| def.id == BadgeId::NightOwl).unwrap();
        let json = serde_json::to_value(Badge::locked(night_owl)).unwrap();
        assert_eq!(json["id"], "night_owl");
        assert_eq!(json["icon"], "moon");
        assert!(json["unlockedAt"].is_null());

        let parsed: Vec<StoredBadge> = serde_json::from_value(serde_json::json!([json])).unwrap();
        assert_eq!(parsed[0].id, "night_owl");
        assert!(parsed[0].unlocked_at.is_none());
    }
}
