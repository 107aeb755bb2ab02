//! Date/time readout shown in the console header.

use chrono::{DateTime, TimeZone};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Formatted date and time strings for one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeReadout {
    pub date: String,
    pub time: String,
}

impl DateTimeReadout {
    /// Format `at` in its own time zone.
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            date: at.format(DATE_FORMAT).to_string(),
            time: at.format(TIME_FORMAT).to_string(),
        }
    }

    /// Readout for the local wall clock.
    pub fn now() -> Self {
        Self::from_datetime(&chrono::Local::now())
    }
}

impl std::fmt::Display for DateTimeReadout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_formats() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        let readout = DateTimeReadout::from_datetime(&at);
        assert_eq!(readout.date, "2024-03-07");
        assert_eq!(readout.time, "09:05:02");
        assert_eq!(readout.to_string(), "2024-03-07 09:05:02");
    }

    #[test]
    fn test_uses_instant_time_zone() {
        let utc = Utc.with_ymd_and_hms(2024, 12, 31, 23, 30, 0).unwrap();
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let readout = DateTimeReadout::from_datetime(&utc.with_timezone(&tz));
        assert_eq!(readout.date, "2025-01-01");
        assert_eq!(readout.time, "01:30:00");
    }
}
