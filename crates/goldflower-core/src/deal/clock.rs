//! Day boundaries. Every participant has to land on the same midnight, so the
//! timezone is an explicit setting rather than whatever the host happens to use.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Deserializes from the same text `FromStr` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum TimezonePolicy {
    #[default]
    Utc,
    /// The host's zone. Only agrees across machines that share a zone.
    Local,
    Fixed(FixedOffset),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("unrecognized timezone '{0}' (expected utc, local or an offset like +08:00)")]
    UnknownTimezone(String),
    #[error("timezone offset '{0}' is out of range")]
    OffsetOutOfRange(String),
}

impl TimezonePolicy {
    pub fn fixed_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(TimezonePolicy::Fixed)
    }

    /// Calendar date containing `now` in this zone.
    pub fn date_of(self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            TimezonePolicy::Utc => now.date_naive(),
            TimezonePolicy::Local => now.with_timezone(&Local).date_naive(),
            TimezonePolicy::Fixed(offset) => now.with_timezone(&offset).date_naive(),
        }
    }
}

impl fmt::Display for TimezonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimezonePolicy::Utc => f.write_str("utc"),
            TimezonePolicy::Local => f.write_str("local"),
            TimezonePolicy::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for TimezonePolicy {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "utc" | "z" | "gmt" => return Ok(TimezonePolicy::Utc),
            "local" => return Ok(TimezonePolicy::Local),
            _ => {}
        }
        let seconds = parse_offset_seconds(trimmed)
            .ok_or_else(|| ClockError::UnknownTimezone(s.to_string()))?;
        FixedOffset::east_opt(seconds)
            .map(TimezonePolicy::Fixed)
            .ok_or_else(|| ClockError::OffsetOutOfRange(s.to_string()))
    }
}

impl TryFrom<String> for TimezonePolicy {
    type Error = ClockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// `+HH`, `+HHMM` or `+HH:MM` (sign required).
fn parse_offset_seconds(raw: &str) -> Option<i32> {
    let (sign, rest) = match *raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };
    if hours.is_empty() || !hours.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !minutes.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

/// Unix timestamp of 00:00:00 on `date` in the policy's zone.
///
/// For `Local`, an ambiguous midnight resolves to the earlier instant and a
/// midnight skipped by a DST jump uses the offset in effect at noon.
pub fn midnight_for_date(policy: TimezonePolicy, date: NaiveDate) -> i64 {
    let naive = date.and_time(NaiveTime::MIN);
    match policy {
        TimezonePolicy::Utc => naive.and_utc().timestamp(),
        TimezonePolicy::Fixed(offset) => utc_seconds(naive, offset.local_minus_utc()),
        TimezonePolicy::Local => match Local.from_local_datetime(&naive).earliest() {
            Some(midnight) => midnight.timestamp(),
            None => {
                let noon = date.and_time(NaiveTime::MIN) + chrono::Duration::hours(12);
                let offset = Local
                    .from_local_datetime(&noon)
                    .earliest()
                    .map(|t| t.offset().local_minus_utc())
                    .unwrap_or(0);
                utc_seconds(naive, offset)
            }
        },
    }
}

/// Unix timestamp of the midnight that starts the day containing `now`.
pub fn midnight_timestamp(policy: TimezonePolicy, now: DateTime<Utc>) -> i64 {
    midnight_for_date(policy, policy.date_of(now))
}

fn utc_seconds(local: NaiveDateTime, offset_seconds: i32) -> i64 {
    local.and_utc().timestamp() - i64::from(offset_seconds)
}

/// Reads the wall clock; everything else in the crate takes times as arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayClock {
    policy: TimezonePolicy,
}

impl DayClock {
    pub const fn new(policy: TimezonePolicy) -> Self {
        Self { policy }
    }

    pub const fn policy(&self) -> TimezonePolicy {
        self.policy
    }

    pub fn midnight_now(&self) -> i64 {
        midnight_timestamp(self.policy, Utc::now())
    }

    pub fn midnight_on(&self, date: NaiveDate) -> i64 {
        midnight_for_date(self.policy, date)
    }
}
