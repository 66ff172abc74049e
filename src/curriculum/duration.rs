use std::fmt;
use std::str::FromStr;

use crate::api::errors::{StudioError, ValidationErrors};

/// A lesson length in whole minutes, sent to the backend as `"HH:MM:SS"`.
///
/// Hours are not wrapped at 24, so a 1500 minute lesson is `"25:00:00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LessonDuration {
    minutes: u32,
}

impl LessonDuration {
    pub fn from_minutes(minutes: u32) -> Self {
        Self { minutes }
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn to_wire(&self) -> String {
        format!("{:02}:{:02}:00", self.minutes / 60, self.minutes % 60)
    }

    /// Parse `"HH:MM:SS"` (or `"HH:MM"`); seconds are dropped
    pub fn parse_wire(value: &str) -> Option<Self> {
        let minutes = u32::try_from(Self::wire_seconds(value)? / 60).ok()?;
        Some(Self::from_minutes(minutes))
    }

    /// Total seconds in a `"HH:MM:SS"` (or `"HH:MM"`) value
    pub fn wire_seconds(value: &str) -> Option<u64> {
        let mut parts = value.trim().split(':');
        let hours: u64 = parts.next()?.trim().parse().ok()?;
        let minutes: u64 = parts.next()?.trim().parse().ok()?;
        let seconds: u64 = match parts.next() {
            Some(seconds) => seconds.trim().parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
            return None;
        }
        hours
            .checked_mul(3600)
            .and_then(|total| total.checked_add(minutes * 60 + seconds))
    }

    /// Sum of wire values, floored to whole minutes only once at the end.
    /// Unparseable values count as zero.
    pub fn sum_wire<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let seconds = values
            .into_iter()
            .filter_map(Self::wire_seconds)
            .fold(0u64, u64::saturating_add);
        Self::from_minutes(u32::try_from(seconds / 60).unwrap_or(u32::MAX))
    }

    /// Summary format used by the course preview, e.g. `"02h 05m"`
    pub fn to_summary(&self) -> String {
        format!("{:02}h {:02}m", self.minutes / 60, self.minutes % 60)
    }
}

impl fmt::Display for LessonDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl FromStr for LessonDuration {
    type Err = StudioError;

    /// Accepts a bare minute count or the wire format
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || StudioError::Validation(ValidationErrors::single("duration", "Invalid lesson duration"));
        if s.contains(':') {
            Self::parse_wire(s).ok_or_else(invalid)
        } else {
            s.trim().parse::<u32>().map(Self::from_minutes).map_err(|_| invalid())
        }
    }
}
