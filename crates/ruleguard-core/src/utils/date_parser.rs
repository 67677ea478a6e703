use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a textual date or timestamp.
///
/// Offsets are normalised to UTC. Bare numbers are never treated as dates.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Convert an Arrow Date32 (days since epoch) value.
pub fn from_epoch_days(days: i32) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(days as i64 * 86_400, 0).map(|dt| dt.naive_utc())
}

/// Convert an epoch offset in milliseconds (Date64, Timestamp(ms)).
pub fn from_epoch_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

pub fn from_epoch_seconds(seconds: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(seconds, 0).map(|dt| dt.naive_utc())
}

pub fn from_epoch_micros(micros: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc())
}

pub fn from_epoch_nanos(nanos: i64) -> Option<NaiveDateTime> {
    Some(DateTime::from_timestamp_nanos(nanos).naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_datetime("2024-03-15"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_datetime(" 2024-03-15 "), Some(ymd(2024, 3, 15)));
    }

    #[test]
    fn test_parse_alternative_date_layouts() {
        assert_eq!(parse_datetime("2024/03/15"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_datetime("03/15/2024"), Some(ymd(2024, 3, 15)));
    }

    #[test]
    fn test_parse_timestamp() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2024-03-15 10:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-03-15T10:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-03-15T10:30"), Some(expected));
        assert_eq!(parse_datetime("2024-03-15T12:30:00+02:00"), Some(expected));
    }

    #[test]
    fn test_numbers_are_not_dates() {
        assert_eq!(parse_datetime("1"), None);
        assert_eq!(parse_datetime("10.5"), None);
        assert_eq!(parse_datetime("20240101"), None);
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("2024-02-30"), None);
        assert_eq!(parse_datetime("not a date"), None);
    }

    #[test]
    fn test_epoch_conversions() {
        assert_eq!(from_epoch_days(0), Some(ymd(1970, 1, 1)));
        assert_eq!(from_epoch_days(19_797), Some(ymd(2024, 3, 15)));
        assert_eq!(from_epoch_millis(86_400_000), Some(ymd(1970, 1, 2)));
    }
}
