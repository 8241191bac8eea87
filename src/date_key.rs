//! Calendar-date keys and the clock that produces "today".
//!
//! A [`DateKey`] is the canonical `YYYY-MM-DD` form of a local calendar
//! date. Every other component sorts and compares days through it. Keys are
//! confined to years `0000..=9999`, so the derived ordering is chronological
//! and identical to the ordering of the rendered strings.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::RwLock;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateKeyError {
    #[error("Invalid date key: {0}")]
    InvalidKey(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

/// Years a key can carry. Outside this range the rendered form would no
/// longer be a four-digit `YYYY`.
const KEY_YEARS: RangeInclusive<i32> = 0..=9999;

impl DateKey {
    /// Fails for dates whose year falls outside `0000..=9999`.
    pub fn from_date(date: NaiveDate) -> Result<Self, DateKeyError> {
        if KEY_YEARS.contains(&date.year()) {
            Ok(Self(date))
        } else {
            Err(DateKeyError::InvalidKey(date.to_string()))
        }
    }

    /// Like `from_date`, but pins out-of-range dates to the nearest end.
    pub fn saturating_from(date: NaiveDate) -> Self {
        if date.year() < *KEY_YEARS.start() {
            Self::earliest()
        } else if date.year() > *KEY_YEARS.end() {
            Self::latest()
        } else {
            Self(date)
        }
    }

    /// 0000-01-01.
    pub fn earliest() -> Self {
        Self(NaiveDate::from_ymd_opt(*KEY_YEARS.start(), 1, 1).unwrap_or(NaiveDate::MIN))
    }

    /// 9999-12-31.
    pub fn latest() -> Self {
        Self(NaiveDate::from_ymd_opt(*KEY_YEARS.end(), 12, 31).unwrap_or(NaiveDate::MAX))
    }

    /// Strict inverse of `Display`: exactly `YYYY-MM-DD`, zero-padded, and a
    /// real calendar day.
    pub fn parse(key: &str) -> Result<Self, DateKeyError> {
        let invalid = || DateKeyError::InvalidKey(key.to_string());

        let bytes = key.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(invalid());
        }
        let digits_ok = bytes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 4 && *i != 7)
            .all(|(_, b)| b.is_ascii_digit());
        if !digits_ok {
            return Err(invalid());
        }

        let year: i32 = key[0..4].parse().map_err(|_| invalid())?;
        let month: u32 = key[5..7].parse().map_err(|_| invalid())?;
        let day: u32 = key[8..10].parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn parts(&self) -> (i32, u32, u32) {
        (self.0.year(), self.0.month(), self.0.day())
    }

    /// `None` when the result leaves the key range.
    pub fn add_days(&self, days: i64) -> Option<Self> {
        let delta = Duration::try_days(days)?;
        let date = self.0.checked_add_signed(delta)?;
        Self::from_date(date).ok()
    }

    /// Stops at the first or last key instead of leaving the range.
    pub fn saturating_add_days(&self, days: i64) -> Self {
        match self.add_days(days) {
            Some(key) => key,
            None if days < 0 => Self::earliest(),
            None => Self::latest(),
        }
    }

    pub fn pred(&self) -> Option<Self> {
        self.add_days(-1)
    }

    /// Signed calendar-day distance `other - self`.
    pub fn days_until(&self, other: DateKey) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// 0 = Sunday .. 6 = Saturday.
    pub fn weekday_index(&self) -> usize {
        self.0.weekday().num_days_from_sunday() as usize
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday_index(), 0 | 6)
    }

    /// Monday of the ISO week containing this day, if that Monday is a key.
    pub fn week_start_monday(&self) -> Option<Self> {
        let offset = self.0.weekday().num_days_from_monday() as i64;
        self.add_days(-offset)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Source of wall-clock time for the session.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    fn today(&self) -> DateKey {
        DateKey::saturating_from(self.now().date_naive())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Local wall-clock time on the given day. Returns `None` for dates that
    /// do not exist or hours skipped by a DST transition.
    pub fn at(year: i32, month: u32, day: u32, hour: u32) -> Option<Self> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, 0, 0)?;
        Local.from_local_datetime(&naive).single().map(Self::new)
    }

    pub fn set(&self, now: DateTime<Local>) {
        if let Ok(mut guard) = self.now.write() {
            *guard = now;
        }
    }

    pub fn advance_days(&self, days: i64) {
        if let Ok(mut guard) = self.now.write() {
            *guard += Duration::days(days);
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn k(y: i32, m: u32, day: u32) -> DateKey {
        DateKey::from_date(d(y, m, day)).unwrap()
    }

    #[test]
    fn test_to_key_zero_pads() {
        assert_eq!(k(2024, 1, 5).to_string(), "2024-01-05");
        assert_eq!(k(987, 12, 31).to_string(), "0987-12-31");
        assert_eq!(DateKey::earliest().to_string(), "0000-01-01");
        assert_eq!(DateKey::latest().to_string(), "9999-12-31");
    }

    #[test]
    fn test_parse_round_trip() {
        for date in [d(2024, 2, 29), d(2023, 12, 31), d(2000, 1, 1), d(0, 1, 1), d(9999, 12, 31)] {
            let key = DateKey::from_date(date).unwrap();
            let parsed = DateKey::parse(&key.to_string()).unwrap();
            assert_eq!(parsed.parts(), (date.year(), date.month(), date.day()));
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "2024-1-05",
            "2024/01/05",
            "24-01-05",
            "2024-13-01",
            "2024-02-30",
            "2023-02-29",
            "2024-00-10",
            "abcd-ef-gh",
            "2024-01-05T00",
            "10000-01-01",
            "-001-01-01",
            "",
        ] {
            assert_eq!(
                DateKey::parse(bad),
                Err(DateKeyError::InvalidKey(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_date_rejects_years_without_four_digits() {
        assert!(DateKey::from_date(d(10000, 1, 1)).is_err());
        assert!(DateKey::from_date(d(-1, 12, 31)).is_err());
        assert!(DateKey::from_date(NaiveDate::MAX).is_err());
        assert!(DateKey::from_date(NaiveDate::MIN).is_err());

        assert_eq!(DateKey::saturating_from(NaiveDate::MAX), DateKey::latest());
        assert_eq!(DateKey::saturating_from(d(-1, 6, 1)), DateKey::earliest());
        assert_eq!(DateKey::saturating_from(d(2024, 6, 1)), k(2024, 6, 1));
    }

    #[test]
    fn test_string_order_matches_calendar_order() {
        let keys = [
            k(0, 1, 1),
            k(999, 12, 31),
            k(1999, 12, 31),
            k(2000, 1, 1),
            k(2000, 1, 10),
            k(2000, 2, 1),
            k(2000, 10, 1),
            k(2024, 3, 3),
            k(9999, 12, 31),
        ];
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].to_string() < pair[1].to_string());
        }
    }

    #[test]
    fn test_weekday_helpers() {
        // 2024-03-02 is a Saturday
        let sat = k(2024, 3, 2);
        assert_eq!(sat.weekday_index(), 6);
        assert!(sat.is_weekend());
        assert_eq!(sat.week_start_monday(), Some(k(2024, 2, 26)));

        let sun = k(2024, 3, 3);
        assert_eq!(sun.weekday_index(), 0);
        assert_eq!(sun.week_start_monday(), Some(k(2024, 2, 26)));
        assert!(!k(2024, 3, 4).is_weekend());
    }

    #[test]
    fn test_add_days_crosses_month_and_year() {
        let key = k(2023, 12, 31);
        assert_eq!(key.add_days(1), Some(k(2024, 1, 1)));
        assert_eq!(key.add_days(61), Some(k(2024, 3, 1)));
        assert_eq!(key.days_until(k(2024, 3, 1)), 61);
        assert_eq!(k(2024, 3, 1).pred(), Some(k(2024, 2, 29)));
    }

    #[test]
    fn test_add_days_stops_at_range_ends() {
        assert_eq!(DateKey::latest().add_days(1), None);
        assert_eq!(DateKey::earliest().pred(), None);
        assert_eq!(k(2024, 1, 1).add_days(i64::MAX), None);
        assert_eq!(k(2024, 1, 1).add_days(i64::MIN), None);

        assert_eq!(k(9999, 12, 30).saturating_add_days(5), DateKey::latest());
        assert_eq!(k(0, 1, 2).saturating_add_days(-10), DateKey::earliest());
        assert_eq!(k(2024, 1, 1).saturating_add_days(-1), k(2023, 12, 31));
    }

    #[test]
    fn test_serde_as_plain_string() {
        let key = k(2024, 7, 4);
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-07-04\"");
        let back: DateKey = serde_json::from_str("\"2024-07-04\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<DateKey>("\"2024-7-4\"").is_err());
    }

    #[test]
    fn test_fixed_clock_advances() {
        let clock = FixedClock::at(2024, 1, 31, 12).unwrap();
        assert_eq!(clock.today().to_string(), "2024-01-31");
        clock.advance_days(1);
        assert_eq!(clock.today().to_string(), "2024-02-01");
    }
}
