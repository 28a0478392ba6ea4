//! Common types used across the engine.

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
///
/// The engine never calls this itself; it is a convenience for hosts that
/// need a wall-clock `now` to inject.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// Seconds in one hour.
pub const SECONDS_PER_HOUR: i64 = 3_600;

/// Convert a signed number of seconds to fractional hours.
pub fn seconds_to_hours(seconds: i64) -> f64 {
    seconds as f64 / SECONDS_PER_HOUR as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_hours() {
        assert_eq!(seconds_to_hours(5_400), 1.5);
        assert_eq!(seconds_to_hours(-7_200), -2.0);
        assert_eq!(seconds_to_hours(0), 0.0);
    }

    #[test]
    fn test_now_is_utc() {
        let ts = now();
        assert_eq!(ts.timezone(), chrono::Utc);
    }
}
