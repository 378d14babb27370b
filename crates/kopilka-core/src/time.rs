//! Timestamp parsing and the localized date line shown under each transaction

use chrono::{Datelike, Local, NaiveDateTime, Timelike};

/// Genitive month names, indexed by zero-based month
pub const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// What an unparsable timestamp renders as
pub const INVALID_DATE: &str = "Invalid Date";

/// Wire format of `created_at`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `YYYY-MM-DD HH:MM[:SS]` wall-clock timestamp (no timezone shift)
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let iso = value.trim().replacen(' ', "T", 1);
    NaiveDateTime::parse_from_str(&iso, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&iso, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// `2019-03-10 03:20:41` → `10 марта 2019 г. в 03:20`
///
/// Malformed input is not special-cased: it renders as [`INVALID_DATE`].
pub fn format_date(value: &str) -> String {
    match parse_timestamp(value) {
        Some(dt) => format!(
            "{} {} {} г. в {}:{}",
            dt.day(),
            MONTHS_GENITIVE[dt.month0() as usize],
            dt.year(),
            kopilka_utils::pad2(dt.hour()),
            kopilka_utils::pad2(dt.minute()),
        ),
        None => INVALID_DATE.to_string(),
    }
}

/// Current local time in the wire format
pub fn now_timestamp() -> String {
    Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string()
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_reference() {
        assert_eq!(format_date("2019-03-10 03:20:41"), "10 марта 2019 г. в 03:20");
    }

    #[test]
    fn test_format_date_padding() {
        assert_eq!(format_date("2021-01-01 00:05:00"), "1 января 2021 г. в 00:05");
        assert_eq!(format_date("2020-12-31 23:59:59"), "31 декабря 2020 г. в 23:59");
    }

    #[test]
    fn test_format_date_without_seconds() {
        assert_eq!(format_date("2022-07-04 18:30"), "4 июля 2022 г. в 18:30");
    }

    #[test]
    fn test_every_month_name() {
        for (i, name) in MONTHS_GENITIVE.iter().enumerate() {
            let ts = format!("2023-{:02}-15 12:00:00", i + 1);
            assert_eq!(format_date(&ts), format!("15 {} 2023 г. в 12:00", name));
        }
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(format_date("yesterday"), INVALID_DATE);
        assert_eq!(format_date("2019-13-10 03:20:41"), INVALID_DATE);
        assert_eq!(format_date(""), INVALID_DATE);
    }

    #[test]
    fn test_now_timestamp_round_trips() {
        assert!(parse_timestamp(&now_timestamp()).is_some());
    }
}
