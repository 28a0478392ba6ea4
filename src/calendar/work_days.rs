//! Set of business weekdays.

use crate::core::{Error, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Weekdays considered business days, indexed 0=Sunday..6=Saturday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WorkDays(u8);

impl WorkDays {
    /// No business days at all.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Monday to Friday.
    pub const fn weekdays() -> Self {
        Self(0b0011_1110)
    }

    /// Every day of the week.
    pub const fn all() -> Self {
        Self(0b0111_1111)
    }

    /// Build from day indices (0=Sunday..6=Saturday).
    pub fn from_indices<I>(indices: I) -> Result<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut days = Self::empty();
        for index in indices {
            if !(0..=6).contains(&index) {
                return Err(Error::InvalidWorkDays(format!(
                    "day index {index} out of range 0..=6"
                )));
            }
            days.0 |= 1 << index;
        }
        Ok(days)
    }

    /// Parse a serialized list of day indices.
    ///
    /// Accepts a JSON array (`[1,2,3]`) or a comma-separated list (`1,2,3`).
    /// An empty list is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let indices: Vec<i64> = if trimmed.starts_with('[') {
            serde_json::from_str(trimmed)
                .map_err(|e| Error::InvalidWorkDays(format!("{trimmed}: {e}")))?
        } else {
            trimmed
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(|part| {
                    part.trim()
                        .parse::<i64>()
                        .map_err(|_| Error::InvalidWorkDays(trimmed.to_string()))
                })
                .collect::<Result<_>>()?
        };

        let days = Self::from_indices(indices)?;
        if days.is_empty() {
            return Err(Error::InvalidWorkDays("no work days given".to_string()));
        }
        Ok(days)
    }

    /// Add a weekday to the set.
    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_sunday();
    }

    /// Check whether a weekday is a business day.
    pub fn contains(&self, day: Weekday) -> bool {
        self.contains_index(day.num_days_from_sunday())
    }

    /// Check by index (0=Sunday).
    pub fn contains_index(&self, index: u32) -> bool {
        index < 7 && self.0 & (1 << index) != 0
    }

    /// Number of business days per week.
    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    /// True when no day is a business day.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Day indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..7).filter(move |i| self.contains_index(u32::from(*i)))
    }
}

impl Default for WorkDays {
    fn default() -> Self {
        Self::weekdays()
    }
}

impl TryFrom<Vec<u8>> for WorkDays {
    type Error = Error;

    fn try_from(value: Vec<u8>) -> Result<Self> {
        Self::from_indices(value.into_iter().map(i64::from))
    }
}

impl From<WorkDays> for Vec<u8> {
    fn from(value: WorkDays) -> Self {
        value.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekdays_default() {
        let days = WorkDays::default();
        assert_eq!(days.len(), 5);
        assert!(days.contains(Weekday::Mon));
        assert!(days.contains(Weekday::Fri));
        assert!(!days.contains(Weekday::Sat));
        assert!(!days.contains(Weekday::Sun));
    }

    #[test]
    fn test_parse_json_and_csv() {
        assert_eq!(WorkDays::parse("[1,2,3,4,5]").unwrap(), WorkDays::weekdays());
        assert_eq!(WorkDays::parse(" 1, 2,3 ,4,5 ").unwrap(), WorkDays::weekdays());

        let weekend = WorkDays::parse("[0,6]").unwrap();
        assert!(weekend.contains(Weekday::Sun));
        assert!(weekend.contains(Weekday::Sat));
        assert_eq!(weekend.len(), 2);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in ["", "[]", "[7]", "[-1]", "mon,tue", "[1,2", "1;2"] {
            assert!(WorkDays::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_iter_and_serde() {
        let mut days = WorkDays::empty();
        days.insert(Weekday::Wed);
        days.insert(Weekday::Mon);
        assert_eq!(days.iter().collect::<Vec<_>>(), vec![1, 3]);

        let json = serde_json::to_string(&days).unwrap();
        assert_eq!(json, "[1,3]");
        let back: WorkDays = serde_json::from_str(&json).unwrap();
        assert_eq!(back, days);
        assert!(serde_json::from_str::<WorkDays>("[9]").is_err());
    }
}
