//! TLC timestamps and elapsed-time labels

use chrono::NaiveDateTime;

/// Format TLC uses in `Starting... (...)`, `Progress(...) at ...` etc.
pub const TLC_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Label used when no baseline time is known yet
pub const UNKNOWN_ELAPSED: &str = "??:??:??";

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp
pub fn parse_date_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TLC_DATE_TIME_FORMAT).ok()
}

/// Format the time between `base` and `at` as `HH:MM:SS`
///
/// Hours are not wrapped at 24. A sample taken before the baseline gets a
/// leading `-`.
pub fn elapsed_label(base: Option<NaiveDateTime>, at: NaiveDateTime) -> String {
    let Some(base) = base else {
        return UNKNOWN_ELAPSED.to_string();
    };
    let secs = (at - base).num_seconds();
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        parse_date_time(s).unwrap()
    }

    #[test]
    fn test_parse_date_time() {
        let t = dt("2024-01-01 10:00:05");
        assert_eq!(t.to_string(), "2024-01-01 10:00:05");
        assert!(parse_date_time("2024-01-01T10:00:05").is_none());
        assert!(parse_date_time("yesterday").is_none());
    }

    #[test]
    fn test_elapsed_without_baseline() {
        assert_eq!(elapsed_label(None, dt("2024-01-01 10:00:05")), "??:??:??");
    }

    #[test]
    fn test_elapsed_seconds() {
        let base = dt("2024-01-01 10:00:00");
        assert_eq!(
            elapsed_label(Some(base), dt("2024-01-01 10:00:05")),
            "00:00:05"
        );
        assert_eq!(
            elapsed_label(Some(base), dt("2024-01-01 11:02:03")),
            "01:02:03"
        );
    }

    #[test]
    fn test_elapsed_hours_not_wrapped() {
        let base = dt("2024-01-01 10:00:00");
        assert_eq!(
            elapsed_label(Some(base), dt("2024-01-03 11:00:01")),
            "49:00:01"
        );
    }

    #[test]
    fn test_elapsed_negative() {
        let base = dt("2024-01-01 10:00:10");
        assert_eq!(
            elapsed_label(Some(base), dt("2024-01-01 10:00:05")),
            "-00:00:05"
        );
    }
}
