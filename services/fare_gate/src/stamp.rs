//! `pickup_datetime` rendering.
//!
//! The legacy service took the UTC wall clock and attached a named zone to
//! it without converting the instant. `Relabel` keeps that output byte for
//! byte; `Convert` shifts the instant into the zone first.

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampMode {
    /// UTC reading, zone offset attached as-is.
    #[default]
    Relabel,
    /// Instant converted into the zone's offset.
    Convert,
}

impl FromStr for TimestampMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relabel" => Ok(Self::Relabel),
            "convert" => Ok(Self::Convert),
            other => Err(format!("unknown timestamp mode {other:?} (relabel|convert)")),
        }
    }
}

impl fmt::Display for TimestampMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Relabel => "relabel",
            Self::Convert => "convert",
        })
    }
}

/// A civil zone reduced to a display name and a fixed offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub name: String,
    pub offset: FixedOffset,
}

impl Zone {
    /// America/New_York as the legacy stack resolved it: local mean time,
    /// UTC-04:56.
    pub fn new_york_lmt() -> Self {
        Self {
            name: "America/New_York".into(),
            offset: FixedOffset::west_opt(4 * 3600 + 56 * 60).unwrap_or_else(utc_offset),
        }
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `Z`.
pub fn parse_offset(raw: &str) -> Result<FixedOffset, String> {
    let s = raw.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Ok(utc_offset());
    }
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(format!("offset {raw:?} must start with + or -")),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("offset {raw:?} must look like -05:00"));
    }
    let hours: i32 = digits[..2].parse().map_err(|_| format!("bad hours in {raw:?}"))?;
    let minutes: i32 = digits[2..].parse().map_err(|_| format!("bad minutes in {raw:?}"))?;
    if minutes >= 60 {
        return Err(format!("bad minutes in {raw:?}"));
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("offset {raw:?} out of range"))
}

/// Render `now` as `YYYY-MM-DD HH:MM:SS[.ffffff]±HH:MM`. The fraction is
/// dropped when the microsecond part is zero, matching the legacy format.
pub fn pickup_stamp(now: DateTime<Utc>, zone: &Zone, mode: TimestampMode) -> String {
    let local = match mode {
        TimestampMode::Convert => now.with_timezone(&zone.offset),
        TimestampMode::Relabel => now
            .naive_utc()
            .and_local_timezone(zone.offset)
            .single()
            .unwrap_or_else(|| now.with_timezone(&zone.offset)),
    };
    if local.nanosecond() / 1_000 == 0 {
        local.format("%Y-%m-%d %H:%M:%S%:z").to_string()
    } else {
        local.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string()
    }
}
