//! Wall-clock time of day used for calendar boundaries.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A local time of day with minute precision.
///
/// Ranges from `00:00` to `24:00` inclusive; `24:00` is the end of the day
/// and is only meaningful as the close of a work window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Start of the day.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };
    /// End of the day (`24:00`).
    pub const END_OF_DAY: TimeOfDay = TimeOfDay { hour: 24, minute: 0 };

    /// Create a time of day, validating the range.
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if minute > 59 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(Error::InvalidTimeOfDay(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    pub(crate) const fn from_hm(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// Hour component.
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute component.
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since local midnight.
    pub fn minutes_from_midnight(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }

    /// Seconds elapsed since local midnight.
    pub fn seconds_from_midnight(&self) -> u32 {
        self.minutes_from_midnight() * 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    /// Accepts `HH:MM`, `HH:MM:SS` (seconds are validated and dropped) or a bare hour.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidTimeOfDay(s.to_string());
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(invalid());
        }

        let number = |part: &str| {
            let part = part.trim();
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u8>().map_err(|_| invalid())
        };
        let hour = number(parts[0])?;
        let minute = match parts.get(1) {
            Some(part) => number(part)?,
            None => 0,
        };
        if let Some(part) = parts.get(2) {
            if number(part)? > 59 {
                return Err(invalid());
            }
        }

        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!("09:30".parse::<TimeOfDay>().unwrap(), TimeOfDay::from_hm(9, 30));
        assert_eq!("9".parse::<TimeOfDay>().unwrap(), TimeOfDay::from_hm(9, 0));
        assert_eq!("17:45:59".parse::<TimeOfDay>().unwrap(), TimeOfDay::from_hm(17, 45));
        assert_eq!(" 24:00 ".parse::<TimeOfDay>().unwrap(), TimeOfDay::END_OF_DAY);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let rejected = [
            "", "abc", "25:00", "24:30", "12:60", "12:00:61", "1:2:3:4", "-1:00", "+9", "+09:00",
            "09:+30",
        ];
        for raw in rejected {
            assert!(raw.parse::<TimeOfDay>().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_ordering_and_offsets() {
        let nine = TimeOfDay::from_hm(9, 0);
        let noon = TimeOfDay::from_hm(12, 0);
        assert!(nine < noon);
        assert_eq!(noon.minutes_from_midnight(), 720);
        assert_eq!(nine.seconds_from_midnight(), 32_400);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&TimeOfDay::from_hm(8, 5)).unwrap();
        assert_eq!(json, "\"08:05\"");

        let parsed: TimeOfDay = serde_json::from_str("\"13:15\"").unwrap();
        assert_eq!(parsed, TimeOfDay::from_hm(13, 15));
        assert!(serde_json::from_str::<TimeOfDay>("\"31:00\"").is_err());
    }
}
