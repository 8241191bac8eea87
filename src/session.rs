//! Session state: the single owner of entries, theme, profile and badges.
//!
//! Every mutation goes through [`Session`], updates the in-memory copy first,
//! then hands the affected record to its [`SlotWriter`]. Storage failures are
//! logged and never undo an in-memory change.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::date_key::{Clock, DateKey};
use crate::models::badge::{merge_catalog, Badge, StoredBadge};
use crate::models::mood::{is_logged_on, DatedEntry, Entry, EntryHistory, Mood};
use crate::models::profile::{ThemePreference, UserProfile};
use crate::models::streak::StreakData;
use crate::services::analytics::{compute_analytics, Analytics};
use crate::services::badges::{newly_unlocked, BadgeEvaluator, SaveContext, TimeOfDayRules};
use crate::services::search::{search_entries, MIN_QUERY_LEN};
use crate::services::streak::{calculate_streak, trailing_run_of};
use crate::store::{RecordKey, SlotWriter, Store, StoreError};

/// Consecutive lowest-mood days that raise the support prompt.
pub const SUPPORT_RUN_DAYS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    Unloaded,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotStates {
    pub entries: SlotState,
    pub theme: SlotState,
    pub profile: SlotState,
    pub badges: SlotState,
}

/// One-shot signals for the screen layer. Each stays raised until cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Signals {
    pub celebration: bool,
    /// New current-streak length when a milestone was crossed.
    pub streak_milestone: Option<u32>,
    pub support_resources: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Celebration,
    StreakMilestone,
    SupportResources,
}

impl std::str::FromStr for SignalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "celebration" => Ok(Self::Celebration),
            "streak_milestone" => Ok(Self::StreakMilestone),
            "support_resources" => Ok(Self::SupportResources),
            other => Err(format!("unknown signal '{other}'")),
        }
    }
}

/// What a single `save_entry` call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub date: DateKey,
    pub entry: Entry,
    pub is_new_day: bool,
    pub streak: StreakData,
    pub newly_unlocked: Vec<Badge>,
    /// Signals raised by this save only.
    pub raised: Signals,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub default_theme: ThemePreference,
    pub time_rules: TimeOfDayRules,
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            default_theme: config.default_theme,
            time_rules: config.time_rules,
        }
    }
}

struct Writers {
    entries: SlotWriter,
    theme: SlotWriter,
    profile: SlotWriter,
    badges: SlotWriter,
}

pub struct Session {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    evaluator: BadgeEvaluator,
    writers: Writers,
    slots: SlotStates,

    entries: EntryHistory,
    theme: ThemePreference,
    profile: Option<UserProfile>,
    badges: Vec<Badge>,

    signals: Signals,
    selected_date: DateKey,
    // Set by select_date; swallows the next return_to_today
    keep_selection: bool,
}

impl Session {
    /// Creates a session with every slot unloaded and holding its default.
    /// Spawns the slot writers, so it must run inside a tokio runtime.
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, options: SessionOptions) -> Self {
        let writers = Writers {
            entries: SlotWriter::spawn(store.clone(), RecordKey::MoodEntries),
            theme: SlotWriter::spawn(store.clone(), RecordKey::ThemePreference),
            profile: SlotWriter::spawn(store.clone(), RecordKey::UserProfile),
            badges: SlotWriter::spawn(store.clone(), RecordKey::UserBadges),
        };
        let today = clock.today();

        Self {
            store,
            clock,
            evaluator: BadgeEvaluator::new(options.time_rules),
            writers,
            slots: SlotStates {
                entries: SlotState::Unloaded,
                theme: SlotState::Unloaded,
                profile: SlotState::Unloaded,
                badges: SlotState::Unloaded,
            },
            entries: EntryHistory::new(),
            theme: options.default_theme,
            profile: None,
            badges: merge_catalog(&[]),
            signals: Signals::default(),
            selected_date: today,
            keep_selection: false,
        }
    }

    /// Loads all four records concurrently. A record that is missing,
    /// unreadable or malformed falls back to its default without affecting
    /// the others. Call before the first mutation.
    pub async fn load(&mut self) {
        let store = self.store.as_ref();
        let (entries, theme, profile, badges) = tokio::join!(
            load_record(store, RecordKey::MoodEntries, decode_entries),
            load_record(store, RecordKey::ThemePreference, decode_theme),
            load_record(store, RecordKey::UserProfile, decode_json::<UserProfile>),
            load_record(store, RecordKey::UserBadges, decode_json::<Vec<StoredBadge>>),
        );

        if let Some(entries) = entries {
            self.entries = entries;
        }
        self.slots.entries = SlotState::Loaded;

        if let Some(theme) = theme {
            self.theme = theme;
        }
        self.slots.theme = SlotState::Loaded;

        self.profile = profile;
        self.slots.profile = SlotState::Loaded;

        self.badges = merge_catalog(badges.as_deref().unwrap_or_default());
        self.slots.badges = SlotState::Loaded;

        tracing::info!(
            entries = self.entries.len(),
            theme = %self.theme,
            has_profile = self.profile.is_some(),
            unlocked_badges = self.badges.iter().filter(|b| b.is_unlocked()).count(),
            "Session loaded"
        );
    }

    /// Logs `mood` for today, replacing any existing entry for today.
    pub fn save_entry(&mut self, mood: Mood, note: impl Into<String>) -> SaveOutcome {
        let now = self.clock.now();
        let today = DateKey::saturating_from(now.date_naive());

        let previous = calculate_streak(&self.entries, today);
        let is_new_day = !is_logged_on(&self.entries, today);

        let entry = Entry::new(mood, note);
        self.entries.insert(today, entry.clone());
        persist_json(&mut self.writers.entries, &self.entries);

        let streak = calculate_streak(&self.entries, today);
        let save = SaveContext {
            hour: now.hour(),
            is_new_day,
        };
        let badges = self.evaluator.evaluate(
            &self.entries,
            &self.badges,
            today,
            Some(save),
            now.with_timezone(&Utc),
        );
        let fresh = newly_unlocked(&self.badges, &badges);
        if badges != self.badges {
            self.badges = badges;
            persist_json(&mut self.writers.badges, &self.badges);
            for badge in &fresh {
                tracing::info!(badge = badge.id.as_str(), "Badge unlocked");
            }
        }

        let mut raised = Signals::default();
        if is_new_day && streak.current > previous.current && streak.current >= 2 {
            tracing::info!(current = streak.current, "Streak milestone");
            raised.streak_milestone = Some(streak.current);
        }
        if mood.is_top() {
            raised.celebration = true;
        }
        if trailing_run_of(&self.entries, Mood::LOWEST, SUPPORT_RUN_DAYS) {
            tracing::info!(days = SUPPORT_RUN_DAYS, "Raising support resources prompt");
            raised.support_resources = true;
        }
        self.raise(&raised);

        tracing::debug!(date = %today, mood = mood.as_str(), is_new_day, "Entry saved");

        SaveOutcome {
            date: today,
            entry,
            is_new_day,
            streak,
            newly_unlocked: fresh,
            raised,
        }
    }

    /// Replaces the profile wholesale.
    pub fn update_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
        persist_json(&mut self.writers.profile, &self.profile);
    }

    pub fn toggle_theme(&mut self) -> ThemePreference {
        self.theme = self.theme.toggled();
        self.writers.theme.submit(self.theme.as_str().to_string());
        self.theme
    }

    /// Explicit navigation; the next `return_to_today` is ignored.
    pub fn select_date(&mut self, date: DateKey) {
        self.selected_date = date;
        self.keep_selection = true;
    }

    /// Moves the selection by `days` without arming the latch. Stops at the
    /// first or last valid key.
    pub fn step_selected_date(&mut self, days: i64) -> DateKey {
        self.selected_date = self.selected_date.saturating_add_days(days);
        self.selected_date
    }

    /// Resets the selection to today unless `select_date` ran since the last
    /// call. Either way the latch is cleared.
    pub fn return_to_today(&mut self) -> DateKey {
        if !self.keep_selection {
            self.selected_date = self.clock.today();
        }
        self.keep_selection = false;
        self.selected_date
    }

    pub fn selected_date(&self) -> DateKey {
        self.selected_date
    }

    pub fn clear_signal(&mut self, kind: SignalKind) {
        match kind {
            SignalKind::Celebration => self.signals.celebration = false,
            SignalKind::StreakMilestone => self.signals.streak_milestone = None,
            SignalKind::SupportResources => self.signals.support_resources = false,
        }
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    pub fn today(&self) -> DateKey {
        self.clock.today()
    }

    pub fn is_today(&self, date: DateKey) -> bool {
        date == self.today()
    }

    pub fn is_future(&self, date: DateKey) -> bool {
        date > self.today()
    }

    pub fn entries(&self) -> &EntryHistory {
        &self.entries
    }

    pub fn entry(&self, date: DateKey) -> Option<&Entry> {
        self.entries.get(&date)
    }

    pub fn streak(&self) -> StreakData {
        calculate_streak(&self.entries, self.today())
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn analytics(&self) -> Analytics {
        compute_analytics(&self.entries)
    }

    /// Surrounding whitespace counts toward the match but not toward the
    /// minimum length.
    pub fn search(&self, query: &str) -> Vec<DatedEntry> {
        if query.trim().chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }
        search_entries(&self.entries, query)
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn slot_states(&self) -> SlotStates {
        self.slots
    }

    /// Waits for every slot's latest submitted value to be written.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let (entries, theme, profile, badges) = tokio::join!(
            self.writers.entries.flush(),
            self.writers.theme.flush(),
            self.writers.profile.flush(),
            self.writers.badges.flush(),
        );
        entries.and(theme).and(profile).and(badges)
    }

    fn raise(&mut self, raised: &Signals) {
        self.signals.celebration |= raised.celebration;
        self.signals.support_resources |= raised.support_resources;
        if raised.streak_milestone.is_some() {
            self.signals.streak_milestone = raised.streak_milestone;
        }
    }
}

fn persist_json<T: Serialize>(writer: &mut SlotWriter, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => writer.submit(json),
        Err(e) => tracing::error!(slot = writer.key().as_str(), error = %e, "Failed to encode record"),
    }
}

async fn load_record<T>(
    store: &dyn Store,
    key: RecordKey,
    decode: impl FnOnce(&str) -> Result<T, StoreError>,
) -> Option<T> {
    match store.get(key).await {
        Ok(Some(raw)) => match decode(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(slot = key.as_str(), error = %e, "Malformed stored record, using default");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::error!(slot = key.as_str(), error = %e, "Failed to load record, using default");
            None
        }
    }
}

fn decode_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, StoreError> {
    Ok(serde_json::from_str(raw)?)
}

/// Entries under keys that do not parse are skipped individually.
fn decode_entries(raw: &str) -> Result<EntryHistory, StoreError> {
    let loose: BTreeMap<String, Entry> = serde_json::from_str(raw)?;
    let mut history = EntryHistory::new();
    for (key, entry) in loose {
        match DateKey::parse(&key) {
            Ok(date) => {
                history.insert(date, entry);
            }
            Err(e) => tracing::warn!(error = %e, "Skipping stored entry with invalid key"),
        }
    }
    Ok(history)
}

fn decode_theme(raw: &str) -> Result<ThemePreference, StoreError> {
    raw.parse().map_err(|reason| StoreError::Malformed {
        key: RecordKey::ThemePreference.as_str(),
        reason,
    })
}
