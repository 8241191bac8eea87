//! Badge unlock rules.
//!
//! Each catalog badge is paired with a predicate over a [`BadgeContext`].
//! Evaluation is pure: it returns a new badge list and never clears an
//! existing unlock timestamp.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::date_key::DateKey;
use crate::models::badge::{Badge, BadgeId};
use crate::models::mood::{mood_on, EntryHistory, Mood};
use crate::models::streak::StreakData;
use crate::services::streak::{calculate_streak, longest_run, longest_run_by, note_count};

/// Facts about the save that triggered an evaluation. Only available at
/// save time, never reconstructed from history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveContext {
    /// Local wall-clock hour (0-23) of the save.
    pub hour: u32,
    /// First save for this day, as opposed to an edit.
    pub is_new_day: bool,
}

/// Hour windows for the time-of-day badges, in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDayRules {
    /// Early badge when the hour is strictly below this.
    pub early_before_hour: u32,
    /// Late badge when the hour is at or above this.
    pub late_from_hour: u32,
}

impl Default for TimeOfDayRules {
    fn default() -> Self {
        Self {
            early_before_hour: 7,
            late_from_hour: 22,
        }
    }
}

pub struct BadgeContext<'a> {
    pub history: &'a EntryHistory,
    pub streak: StreakData,
    pub notes: u32,
    pub save: Option<SaveContext>,
    pub time_rules: TimeOfDayRules,
}

impl<'a> BadgeContext<'a> {
    pub fn new(
        history: &'a EntryHistory,
        today: DateKey,
        save: Option<SaveContext>,
        time_rules: TimeOfDayRules,
    ) -> Self {
        Self {
            history,
            streak: calculate_streak(history, today),
            notes: note_count(history),
            save,
            time_rules,
        }
    }

    fn logged(&self) -> impl Iterator<Item = (DateKey, Mood)> + '_ {
        self.history
            .iter()
            .filter_map(|(date, entry)| entry.mood.map(|mood| (*date, mood)))
    }

    fn new_day_save(&self) -> Option<SaveContext> {
        self.save.filter(|save| save.is_new_day)
    }
}

struct BadgeRule {
    id: BadgeId,
    unlocked: fn(&BadgeContext<'_>) -> bool,
}

const RULES: &[BadgeRule] = &[
    BadgeRule { id: BadgeId::FirstEntry, unlocked: total_days_at_least::<1> },
    BadgeRule { id: BadgeId::Days100, unlocked: total_days_at_least::<100> },
    BadgeRule { id: BadgeId::Notes10, unlocked: notes_at_least::<10> },
    BadgeRule { id: BadgeId::Notes50, unlocked: notes_at_least::<50> },
    BadgeRule { id: BadgeId::Streak7, unlocked: streak_at_least::<7> },
    BadgeRule { id: BadgeId::Streak14, unlocked: streak_at_least::<14> },
    BadgeRule { id: BadgeId::Streak30, unlocked: streak_at_least::<30> },
    BadgeRule { id: BadgeId::Streak180, unlocked: streak_at_least::<180> },
    BadgeRule { id: BadgeId::Streak365, unlocked: streak_at_least::<365> },
    BadgeRule { id: BadgeId::GreatWeek, unlocked: great_week },
    BadgeRule { id: BadgeId::FullSpectrum, unlocked: full_spectrum },
    BadgeRule { id: BadgeId::Comeback, unlocked: comeback },
    BadgeRule { id: BadgeId::WeekendWarrior, unlocked: weekend_warrior },
    BadgeRule { id: BadgeId::EarlyBird, unlocked: early_bird },
    BadgeRule { id: BadgeId::NightOwl, unlocked: night_owl },
];

const GREAT_RUN_DAYS: u32 = 7;
const COMEBACK_LOW_DAYS: i64 = 3;
const WEEKEND_WEEKS: u32 = 4;

fn total_days_at_least<const N: u32>(ctx: &BadgeContext<'_>) -> bool {
    ctx.streak.total_days >= N
}

fn notes_at_least<const N: u32>(ctx: &BadgeContext<'_>) -> bool {
    ctx.notes >= N
}

fn streak_at_least<const N: u32>(ctx: &BadgeContext<'_>) -> bool {
    ctx.streak.current >= N || ctx.streak.longest >= N
}

fn great_week(ctx: &BadgeContext<'_>) -> bool {
    let great_days = ctx
        .logged()
        .filter(|(_, mood)| mood.is_top())
        .map(|(date, _)| date);
    longest_run(great_days) >= GREAT_RUN_DAYS
}

fn full_spectrum(ctx: &BadgeContext<'_>) -> bool {
    let seen: BTreeSet<Mood> = ctx.logged().map(|(_, mood)| mood).collect();
    seen.len() >= Mood::ALL.len()
}

/// A top-mood day whose three preceding calendar days were all low.
fn comeback(ctx: &BadgeContext<'_>) -> bool {
    ctx.history
        .iter()
        .rev()
        .filter(|(_, entry)| entry.mood.is_some_and(Mood::is_top))
        .any(|(date, _)| {
            (1..=COMEBACK_LOW_DAYS)
                .all(|back| {
                    date.add_days(-back)
                        .and_then(|day| mood_on(ctx.history, day))
                        .is_some_and(Mood::is_low)
                })
        })
}

/// Weekend logs in consecutive Monday-aligned weeks.
fn weekend_warrior(ctx: &BadgeContext<'_>) -> bool {
    let weeks: BTreeSet<DateKey> = ctx
        .logged()
        .filter(|(date, _)| date.is_weekend())
        .filter_map(|(date, _)| date.week_start_monday())
        .collect();
    longest_run_by(weeks, 7) >= WEEKEND_WEEKS
}

fn early_bird(ctx: &BadgeContext<'_>) -> bool {
    ctx.new_day_save()
        .is_some_and(|save| save.hour < ctx.time_rules.early_before_hour)
}

fn night_owl(ctx: &BadgeContext<'_>) -> bool {
    ctx.new_day_save()
        .is_some_and(|save| save.hour >= ctx.time_rules.late_from_hour)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeEvaluator {
    time_rules: TimeOfDayRules,
}

impl BadgeEvaluator {
    pub fn new(time_rules: TimeOfDayRules) -> Self {
        Self { time_rules }
    }

    /// Returns `current` with every newly satisfied badge stamped `now`.
    /// Already-unlocked badges are passed through untouched.
    pub fn evaluate(
        &self,
        history: &EntryHistory,
        current: &[Badge],
        today: DateKey,
        save: Option<SaveContext>,
        now: DateTime<Utc>,
    ) -> Vec<Badge> {
        let ctx = BadgeContext::new(history, today, save, self.time_rules);

        current
            .iter()
            .cloned()
            .map(|mut badge| {
                if !badge.is_unlocked() && rule_holds(badge.id, &ctx) {
                    badge.unlocked_at = Some(now);
                }
                badge
            })
            .collect()
    }
}

fn rule_holds(id: BadgeId, ctx: &BadgeContext<'_>) -> bool {
    RULES
        .iter()
        .find(|rule| rule.id == id)
        .is_some_and(|rule| (rule.unlocked)(ctx))
}

/// Badges unlocked in `after` but not in `before`.
pub fn newly_unlocked(before: &[Badge], after: &[Badge]) -> Vec<Badge> {
    after
        .iter()
        .filter(|badge| badge.is_unlocked())
        .filter(|badge| {
            !before
                .iter()
                .any(|prev| prev.id == badge.id && prev.is_unlocked())
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::badge::{merge_catalog, CATALOG};
    use crate::models::mood::Entry;

    fn key(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    fn now() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    fn locked() -> Vec<Badge> {
        merge_catalog(&[])
    }

    /// `count` consecutive days starting at `start`, all with `mood`.
    fn run(history: &mut EntryHistory, start: &str, count: i64, mood: Mood) {
        let start = key(start);
        for i in 0..count {
            history.insert(start.add_days(i).unwrap(), Entry::new(mood, ""));
        }
    }

    fn unlocked_ids(badges: &[Badge]) -> BTreeSet<BadgeId> {
        badges
            .iter()
            .filter(|b| b.is_unlocked())
            .map(|b| b.id)
            .collect()
    }

    fn ctx_for<'a>(history: &'a EntryHistory, today: &str, save: Option<SaveContext>) -> BadgeContext<'a> {
        BadgeContext::new(history, key(today), save, TimeOfDayRules::default())
    }

    #[test]
    fn test_every_catalog_badge_has_a_rule() {
        for def in CATALOG {
            assert!(RULES.iter().any(|r| r.id == def.id), "no rule for {:?}", def.id);
        }
        assert_eq!(RULES.len(), CATALOG.len());
    }

    #[test]
    fn test_first_entry_unlocks_on_first_log() {
        let mut history = EntryHistory::new();
        run(&mut history, "2024-06-01", 1, Mood::Ok);
        let badges = BadgeEvaluator::default().evaluate(&history, &locked(), key("2024-06-01"), None, now());
        assert_eq!(unlocked_ids(&badges), BTreeSet::from([BadgeId::FirstEntry]));
    }

    #[test]
    fn test_streak_milestones_use_longest_as_well_as_current() {
        let mut history = EntryHistory::new();
        run(&mut history, "2024-01-01", 14, Mood::Good);
        // long after the run ended: current is 0, longest is 14
        let ctx = ctx_for(&history, "2024-05-01", None);
        assert_eq!(ctx.streak.current, 0);
        assert!(streak_at_least::<7>(&ctx));
        assert!(streak_at_least::<14>(&ctx));
        assert!(!streak_at_least::<30>(&ctx));
    }

    #[test]
    fn test_note_milestones_count_trimmed_notes() {
        let mut history = EntryHistory::new();
        let start = key("2024-01-01");
        for i in 0..10 {
            history.insert(start.add_days(i).unwrap(), Entry::new(Mood::Ok, "wrote something"));
        }
        history.insert(start.add_days(10).unwrap(), Entry::new(Mood::Ok, "   "));
        let ctx = ctx_for(&history, "2024-01-11", None);
        assert!(notes_at_least::<10>(&ctx));
        assert!(!notes_at_least::<50>(&ctx));
    }

    #[test]
    fn test_great_week_needs_adjacent_days() {
        let mut history = EntryHistory::new();
        run(&mut history, "2024-02-01", 6, Mood::Great);
        run(&mut history, "2024-02-07", 1, Mood::Good);
        run(&mut history, "2024-02-08", 6, Mood::Great);
        assert!(!great_week(&ctx_for(&history, "2024-02-13", None)));

        run(&mut history, "2024-02-07", 1, Mood::Great);
        assert!(great_week(&ctx_for(&history, "2024-02-13", None)));
    }

    #[test]
    fn test_full_spectrum() {
        let mut history = EntryHistory::new();
        for (i, mood) in Mood::ALL.iter().take(4).enumerate() {
            history.insert(key("2024-03-01").add_days(i as i64 * 3).unwrap(), Entry::new(*mood, ""));
        }
        assert!(!full_spectrum(&ctx_for(&history, "2024-03-20", None)));
        history.insert(key("2024-03-20"), Entry::new(Mood::Bad, ""));
        assert!(full_spectrum(&ctx_for(&history, "2024-03-20", None)));
    }

    #[test]
    fn test_comeback_after_three_low_days() {
        let mut history = EntryHistory::new();
        history.insert(key("2024-04-01"), Entry::new(Mood::Bad, ""));
        history.insert(key("2024-04-02"), Entry::new(Mood::NotGood, ""));
        history.insert(key("2024-04-03"), Entry::new(Mood::Bad, ""));
        history.insert(key("2024-04-04"), Entry::new(Mood::Great, ""));
        assert!(comeback(&ctx_for(&history, "2024-04-04", None)));
    }

    #[test]
    fn test_comeback_requires_contiguous_low_days() {
        let mut history = EntryHistory::new();
        history.insert(key("2024-04-01"), Entry::new(Mood::Bad, ""));
        history.insert(key("2024-04-02"), Entry::new(Mood::Ok, ""));
        history.insert(key("2024-04-03"), Entry::new(Mood::Bad, ""));
        history.insert(key("2024-04-04"), Entry::new(Mood::Bad, ""));
        history.insert(key("2024-04-05"), Entry::new(Mood::Great, ""));
        assert!(!comeback(&ctx_for(&history, "2024-04-05", None)));

        // a missing day also breaks the run
        let mut gap = EntryHistory::new();
        gap.insert(key("2024-04-01"), Entry::new(Mood::Bad, ""));
        gap.insert(key("2024-04-02"), Entry::new(Mood::Bad, ""));
        gap.insert(key("2024-04-04"), Entry::new(Mood::Great, ""));
        assert!(!comeback(&ctx_for(&gap, "2024-04-04", None)));
    }

    #[test]
    fn test_weekend_warrior_consecutive_weeks() {
        let mut history = EntryHistory::new();
        // Saturdays/Sundays of four consecutive weeks
        for day in ["2024-03-02", "2024-03-10", "2024-03-16", "2024-03-23"] {
            history.insert(key(day), Entry::new(Mood::Ok, ""));
        }
        assert!(weekend_warrior(&ctx_for(&history, "2024-03-23", None)));
    }

    #[test]
    fn test_weekend_warrior_broken_by_skipped_week() {
        let mut history = EntryHistory::new();
        for day in ["2024-03-02", "2024-03-03", "2024-03-09", "2024-03-23", "2024-03-30"] {
            history.insert(key(day), Entry::new(Mood::Ok, ""));
        }
        // weekdays never count
        history.insert(key("2024-03-13"), Entry::new(Mood::Ok, ""));
        history.insert(key("2024-03-20"), Entry::new(Mood::Ok, ""));
        assert!(!weekend_warrior(&ctx_for(&history, "2024-03-30", None)));
    }

    #[test]
    fn test_time_of_day_only_on_new_day_saves() {
        let mut history = EntryHistory::new();
        run(&mut history, "2024-06-01", 1, Mood::Ok);
        let rules = TimeOfDayRules::default();

        let early = Some(SaveContext { hour: 5, is_new_day: true });
        let edit = Some(SaveContext { hour: 5, is_new_day: false });
        let late = Some(SaveContext { hour: 23, is_new_day: true });

        assert!(early_bird(&BadgeContext::new(&history, key("2024-06-01"), early, rules)));
        assert!(!early_bird(&BadgeContext::new(&history, key("2024-06-01"), edit, rules)));
        assert!(!early_bird(&BadgeContext::new(&history, key("2024-06-01"), None, rules)));
        assert!(night_owl(&BadgeContext::new(&history, key("2024-06-01"), late, rules)));
        assert!(!night_owl(&BadgeContext::new(&history, key("2024-06-01"), early, rules)));
    }

    #[test]
    fn test_unlock_timestamp_never_overwritten() {
        let mut history = EntryHistory::new();
        run(&mut history, "2024-06-01", 1, Mood::Ok);
        let evaluator = BadgeEvaluator::default();

        let first = evaluator.evaluate(&history, &locked(), key("2024-06-01"), None, now());
        let later: DateTime<Utc> = "2024-07-01T12:00:00Z".parse().unwrap();
        let second = evaluator.evaluate(&history, &first, key("2024-06-01"), None, later);

        assert_eq!(first, second);
    }

    #[test]
    fn test_unlocks_survive_history_growth() {
        let mut history = EntryHistory::new();
        run(&mut history, "2024-01-01", 7, Mood::Great);
        let evaluator = BadgeEvaluator::default();
        let before = evaluator.evaluate(&history, &locked(), key("2024-01-07"), None, now());
        assert!(unlocked_ids(&before).contains(&BadgeId::GreatWeek));

        run(&mut history, "2024-01-08", 5, Mood::Bad);
        let after = evaluator.evaluate(&history, &before, key("2024-01-12"), None, now());
        assert!(unlocked_ids(&before).is_subset(&unlocked_ids(&after)));
    }

    #[test]
    fn test_newly_unlocked_diff() {
        let mut history = EntryHistory::new();
        run(&mut history, "2024-06-01", 1, Mood::Ok);
        let before = locked();
        let after = BadgeEvaluator::default().evaluate(&history, &before, key("2024-06-01"), None, now());
        let fresh = newly_unlocked(&before, &after);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].id, BadgeId::FirstEntry);
        assert!(newly_unlocked(&after, &after).is_empty());
    }
}
