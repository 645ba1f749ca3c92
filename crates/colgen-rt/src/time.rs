//! Date/DateTime rendering pinned to a named IANA zone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

const SECONDS_PER_DAY: i64 = 86_400;

pub fn is_valid_timezone(name: &str) -> bool {
    name.parse::<Tz>().is_ok()
}

/// Renders a day count since the epoch as `YYYY-MM-DD` in `tz`.
pub fn render_date(days: u16, tz: &str) -> String {
    render(i64::from(days) * SECONDS_PER_DAY, tz, "%Y-%m-%d")
}

/// Renders a second count since the epoch as `YYYY-MM-DDTHH:MM:SS` in `tz`.
pub fn render_datetime(secs: u32, tz: &str) -> String {
    render(i64::from(secs), tz, "%Y-%m-%dT%H:%M:%S")
}

// Oracle-side only: an unknown zone is a fatal fault of the generated test code.
fn render(unix_s: i64, tz: &str, pattern: &str) -> String {
    let zone: Tz = match tz.parse() {
        Ok(zone) => zone,
        Err(err) => panic!("unknown reference timezone {tz:?}: {err}"),
    };
    let Some(utc) = DateTime::<Utc>::from_timestamp(unix_s, 0) else {
        panic!("timestamp {unix_s} is out of range");
    };
    utc.with_timezone(&zone).format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_in_moscow() {
        assert_eq!(render_date(0, "Europe/Moscow"), "1970-01-01");
        assert_eq!(render_datetime(0, "Europe/Moscow"), "1970-01-01T03:00:00");
    }

    #[test]
    fn rendering_ignores_local_zone() {
        assert_eq!(render_date(17_000, "Europe/Moscow"), "2016-07-18");
        assert_eq!(
            render_datetime(1_500_000_000, "Europe/Moscow"),
            "2017-07-14T05:40:00"
        );
        assert_eq!(render_datetime(1_500_000_000, "UTC"), "2017-07-14T02:40:00");
    }

    #[test]
    fn zone_validation() {
        assert!(is_valid_timezone("Europe/Moscow"));
        assert!(is_valid_timezone("UTC"));
        assert!(!is_valid_timezone("Mars/Olympus_Mons"));
    }

    #[test]
    #[should_panic(expected = "unknown reference timezone")]
    fn unknown_zone_is_fatal() {
        render_date(0, "Nowhere/Special");
    }
}
