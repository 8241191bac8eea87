use serde::Serialize;

use crate::date_key::DateKey;

/// Logging streak summary derived from the entry history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakData {
    pub current: u32,
    pub longest: u32,
    pub total_days: u32,
    pub last_logged_date: Option<DateKey>,
}
