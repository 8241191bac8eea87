//! # Perchly: Request/Response DTOs
//!
//! API contract types in one module.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Query`    → deserialized from query params
//! - `*Response` → serialized to client JSON
//! - Field limits are expressed via `validator` derive macros

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::date_key::DateKey;
use crate::models::badge::Badge;
use crate::models::mood::{DatedEntry, Entry, Mood};
use crate::models::profile::{ThemePalette, ThemePreference, UserProfile};
use crate::models::streak::StreakData;
use crate::services::analytics::{Analytics, WEEKDAY_NAMES};

// ============================================================================
// Entries
// ============================================================================

/// POST /api/entries
#[derive(Debug, Deserialize, Validate)]
pub struct SaveEntryRequest {
    pub mood: Mood,

    #[serde(default)]
    #[validate(length(max = 240, message = "Note must be at most 240 characters"))]
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub date: DateKey,
    pub entry: Entry,
    pub is_today: bool,
    pub is_future: bool,
}

/// GET /api/entries
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

// ============================================================================
// Insights
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StreakResponse {
    #[serde(flatten)]
    pub streak: StreakData,
    pub logged_today: bool,
}

#[derive(Debug, Serialize)]
pub struct BadgesResponse {
    pub unlocked: usize,
    pub total: usize,
    pub badges: Vec<Badge>,
}

impl From<&[Badge]> for BadgesResponse {
    fn from(badges: &[Badge]) -> Self {
        Self {
            unlocked: badges.iter().filter(|b| b.is_unlocked()).count(),
            total: badges.len(),
            badges: badges.to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoodShare {
    pub mood: Mood,
    pub label: &'static str,
    pub color: &'static str,
    pub count: u32,
    pub percentage: u32,
}

#[derive(Debug, Serialize)]
pub struct WeekdayAverage {
    pub day: &'static str,
    pub entries: u32,
    pub average: Option<f64>,
    /// Mood closest to the average, for coloring.
    pub mood: Option<Mood>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub logged_days: u32,
    pub total_notes: u32,
    pub moods: Vec<MoodShare>,
    pub day_of_week: Vec<WeekdayAverage>,
}

impl From<&Analytics> for AnalyticsResponse {
    fn from(analytics: &Analytics) -> Self {
        let moods = Mood::ALL
            .iter()
            .map(|&mood| MoodShare {
                mood,
                label: mood.label(),
                color: mood.color(),
                count: analytics.mood_counts.get(&mood).copied().unwrap_or(0),
                percentage: analytics.percentage(mood),
            })
            .collect();

        let day_of_week = WEEKDAY_NAMES
            .iter()
            .zip(analytics.day_of_week.iter())
            .map(|(day, totals)| {
                let average = totals.average();
                WeekdayAverage {
                    day: *day,
                    entries: totals.count,
                    average,
                    mood: average.map(Mood::from_average),
                }
            })
            .collect();

        Self {
            logged_days: analytics.logged_days(),
            total_notes: analytics.total_notes,
            moods,
            day_of_week,
        }
    }
}

// ============================================================================
// Search
// ============================================================================

/// GET /api/search?q=
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<DatedEntry>,
}

// ============================================================================
// Calendar
// ============================================================================

/// GET /api/calendar/week?date=
#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub date: Option<String>,
}

/// GET /api/calendar/month?year=&month=
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// GET /api/calendar/year?year=
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

// ============================================================================
// Profile & theme
// ============================================================================

/// PUT /api/profile
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 30, message = "Name must be 1-30 characters"))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: ThemePreference,
    pub palette: &'static ThemePalette,
}

impl From<ThemePreference> for ThemeResponse {
    fn from(theme: ThemePreference) -> Self {
        Self {
            theme,
            palette: theme.palette(),
        }
    }
}

// ============================================================================
// Navigation & signals
// ============================================================================

/// POST /api/navigation/select
#[derive(Debug, Deserialize)]
pub struct SelectDateRequest {
    pub date: String,
}

/// POST /api/navigation/step
#[derive(Debug, Deserialize, Validate)]
pub struct StepDateRequest {
    #[validate(range(min = -366, max = 366, message = "Step must be within a year"))]
    pub days: i64,
}

#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub selected_date: DateKey,
    pub today: DateKey,
    pub is_today: bool,
    pub is_future: bool,
}
