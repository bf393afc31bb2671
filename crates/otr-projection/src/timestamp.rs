use chrono::{DateTime, NaiveDateTime};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Reformat a datetime string for display.
///
/// Accepts RFC 3339 (`2025-06-01T09:30:00Z`, `2025-06-01T09:30:00+02:00`)
/// and offset-less ISO 8601 datetimes (`2025-06-01T09:30:00`, optionally
/// with fractional seconds). The wall-clock time is kept in its own offset.
/// Returns `None` for anything else, including bare dates and all-digit
/// strings: order and reservation numbers are digit strings too, so an
/// epoch in string form is not recognized.
pub fn display_date(raw: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.format(DISPLAY_FORMAT).to_string());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_with_offset() {
        assert_eq!(
            display_date("2025-06-01T09:30:00+02:00").as_deref(),
            Some("2025-06-01 09:30")
        );
        assert_eq!(
            display_date("2025-06-01T09:30:59.123Z").as_deref(),
            Some("2025-06-01 09:30")
        );
    }

    #[test]
    fn naive_datetime() {
        assert_eq!(
            display_date("2025-06-01T14:05:00").as_deref(),
            Some("2025-06-01 14:05")
        );
        assert_eq!(
            display_date("2025-06-01T14:05:00.5").as_deref(),
            Some("2025-06-01 14:05")
        );
    }

    #[test]
    fn non_datetimes_pass() {
        assert_eq!(display_date("2025-06-01"), None);
        assert_eq!(display_date("BOOKED"), None);
        assert_eq!(display_date("5YJ3E7EB0KF123456"), None);
        assert_eq!(display_date(""), None);
    }

    #[test]
    fn digit_strings_are_not_epochs() {
        assert_eq!(display_date("1717232400000"), None);
        assert_eq!(display_date("1717232400"), None);
        assert_eq!(display_date("-1717232400"), None);
    }
}
