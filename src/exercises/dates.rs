use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

const DATE_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]"),
    format_description!("[year]-[month padding:none]-[day padding:none]"),
    format_description!("[year]/[month padding:none]/[day padding:none]"),
    format_description!("[weekday repr:short] [month repr:short] [day] [year]"),
    format_description!("[month repr:long] [day padding:none], [year]"),
    format_description!("[month repr:short] [day padding:none], [year]"),
];

const DATE_TIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
];

const DATE_STRING_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[weekday repr:short] [month repr:short] [day] [year]");

/// Parses a user-supplied calendar date. Values without an offset are UTC.
pub fn parse_date(input: &str) -> Option<OffsetDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(dt);
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = PrimitiveDateTime::parse(s, *fmt) {
            return Some(dt.assume_utc());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| Date::parse(s, *fmt).ok())
        .map(|d| d.midnight().assume_utc())
}

/// Renders the date part of `dt` in UTC, e.g. `Mon May 01 2023`.
pub fn date_string(dt: OffsetDateTime) -> anyhow::Result<String> {
    Ok(dt.to_offset(UtcOffset::UTC).format(DATE_STRING_FORMAT)?)
}

pub fn epoch_millis(dt: OffsetDateTime) -> i64 {
    (dt.unix_timestamp_nanos().div_euclid(1_000_000)) as i64
}

/// Lower bound for a `from` filter: one day before the given instant.
pub fn from_bound(dt: OffsetDateTime) -> i64 {
    epoch_millis(dt) - MS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_iso_date_as_utc_midnight() {
        let dt = parse_date("2023-05-01").expect("iso date");
        assert_eq!(dt, datetime!(2023-05-01 0:00 UTC));
        assert_eq!(parse_date("2023-5-1"), Some(dt));
    }

    #[test]
    fn parses_timestamps() {
        assert_eq!(
            parse_date("2023-05-01T10:30:00Z"),
            Some(datetime!(2023-05-01 10:30 UTC))
        );
        assert_eq!(
            parse_date("2023-05-01T10:30:00+02:00"),
            Some(datetime!(2023-05-01 8:30 UTC))
        );
        assert_eq!(
            parse_date("2023-05-01T10:30:00"),
            Some(datetime!(2023-05-01 10:30 UTC))
        );
        assert_eq!(
            parse_date("2023-05-01T10:30"),
            Some(datetime!(2023-05-01 10:30 UTC))
        );
        assert_eq!(
            parse_date("2023-05-01 10:30:00"),
            Some(datetime!(2023-05-01 10:30 UTC))
        );
        assert_eq!(
            parse_date("2023-05-01 10:30:15.250"),
            Some(datetime!(2023-05-01 10:30:15.250 UTC))
        );
    }

    #[test]
    fn parses_rendered_form() {
        assert_eq!(
            parse_date("Mon May 01 2023"),
            Some(datetime!(2023-05-01 0:00 UTC))
        );
        let may_first = Some(datetime!(2023-05-01 0:00 UTC));
        assert_eq!(parse_date("2023/05/01"), may_first);
        assert_eq!(parse_date("2023/5/1"), may_first);
        assert_eq!(parse_date("May 1, 2023"), may_first);
        assert_eq!(parse_date("May 01, 2023"), may_first);
        assert_eq!(
            parse_date("January 15, 2023"),
            Some(datetime!(2023-01-15 0:00 UTC))
        );
        assert_eq!(
            parse_date("Jan 15, 2023"),
            Some(datetime!(2023-01-15 0:00 UTC))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date("2023-13-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn renders_date_string() {
        let dt = datetime!(2023-05-01 23:59 UTC);
        assert_eq!(date_string(dt).unwrap(), "Mon May 01 2023");
        let shifted = datetime!(2023-05-02 1:00 +03:00);
        assert_eq!(date_string(shifted).unwrap(), "Mon May 01 2023");
    }

    #[test]
    fn millis_and_day_shift() {
        let dt = datetime!(1970-01-02 0:00 UTC);
        assert_eq!(epoch_millis(dt), MS_PER_DAY);
        assert_eq!(from_bound(dt), 0);
        assert_eq!(epoch_millis(datetime!(2023-05-01 0:00 UTC)), 1_682_899_200_000);
    }
}
