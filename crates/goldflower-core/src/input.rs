//! Validation of the values a player types in.
//!
//! The shell calls these repeatedly until they succeed; the deal pipeline only
//! ever sees the validated newtypes below.

use core::fmt;
use serde::Serialize;
use thiserror::Error;

/// 52 cards, 3 per player, one card left over.
pub const MAX_PLAYERS: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerNumber(u8);

impl PlayerNumber {
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= MAX_PLAYERS {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Every seat at a full table, 1 through 17.
    pub fn all() -> impl Iterator<Item = PlayerNumber> {
        (1..=MAX_PLAYERS).map(PlayerNumber)
    }
}

impl fmt::Display for PlayerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RoundNumber(u64);

impl RoundNumber {
    pub const fn new(value: u64) -> Option<Self> {
        if value >= 1 { Some(Self(value)) } else { None }
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RoundNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The value every participant types identically. Kept byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SharedValue(String);

impl SharedValue {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() { None } else { Some(Self(value)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a round prompt asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundCommand {
    Deal(RoundNumber),
    /// Any integer below 1 ends the session.
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("please enter a valid number")]
    NotANumber { raw: String },
    #[error("player number must be greater than 0")]
    PlayerNumberTooSmall,
    #[error(
        "player number cannot exceed {max} (52 cards, 3 per player, at most {max} players)"
    )]
    PlayerNumberTooLarge { max: u8 },
    #[error("shared value must not be empty")]
    EmptySharedValue,
    #[error("round number cannot exceed {max}")]
    RoundNumberTooLarge { max: u64 },
}

/// An optional ASCII sign followed by digits. Full-width digits (as typed with
/// a CJK input method) count as digits, and single underscores may separate
/// them. Magnitudes past `i128` saturate; callers only compare against small
/// bounds.
fn parse_integer(raw: &str) -> Result<i128, InputError> {
    let trimmed = raw.trim();
    let not_a_number = || InputError::NotANumber {
        raw: trimmed.to_string(),
    };
    let (negative, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i128 = 0;
    let mut digits = 0usize;
    let mut after_underscore = false;
    for c in body.chars() {
        if c == '_' {
            if digits == 0 || after_underscore {
                return Err(not_a_number());
            }
            after_underscore = true;
            continue;
        }
        let digit = decimal_digit(c).ok_or_else(not_a_number)?;
        value = value.saturating_mul(10).saturating_add(i128::from(digit));
        digits += 1;
        after_underscore = false;
    }
    if digits == 0 || after_underscore {
        return Err(not_a_number());
    }
    Ok(if negative { -value } else { value })
}

fn decimal_digit(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        '\u{ff10}'..='\u{ff19}' => u8::try_from(u32::from(c) - 0xff10).ok(),
        _ => None,
    }
}

pub fn parse_player_number(raw: &str) -> Result<PlayerNumber, InputError> {
    let value = parse_integer(raw)?;
    if value < 1 {
        return Err(InputError::PlayerNumberTooSmall);
    }
    u8::try_from(value)
        .ok()
        .and_then(PlayerNumber::new)
        .ok_or(InputError::PlayerNumberTooLarge { max: MAX_PLAYERS })
}

/// Only the line terminator is removed; surrounding spaces are part of the value.
pub fn parse_shared_value(raw: &str) -> Result<SharedValue, InputError> {
    let line = raw
        .strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(raw);
    SharedValue::new(line).ok_or(InputError::EmptySharedValue)
}

pub fn parse_round(raw: &str) -> Result<RoundCommand, InputError> {
    let value = parse_integer(raw)?;
    if value < 1 {
        return Ok(RoundCommand::End);
    }
    u64::try_from(value)
        .ok()
        .and_then(RoundNumber::new)
        .map(RoundCommand::Deal)
        .ok_or(InputError::RoundNumberTooLarge { max: u64::MAX })
}
