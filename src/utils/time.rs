use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveTime, Offset, Utc, Weekday,
};

use crate::error::{AttendanceError, Result};

/// Source of the current instant, expressed in the server's local offset.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    fn offset(&self) -> FixedOffset {
        *self.now().offset()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Wall clock in the host's current local offset.
    pub fn local() -> Self {
        Self::new(*Local::now().offset())
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

pub fn parse_time_string(time_str: &str) -> Result<NaiveTime> {
    let time_str = time_str.trim();

    if let Ok(time) = NaiveTime::parse_from_str(time_str, "%H:%M:%S") {
        return Ok(time);
    }

    if let Ok(time) = NaiveTime::parse_from_str(time_str, "%H:%M") {
        return Ok(time);
    }

    Err(AttendanceError::invalid(format!(
        "invalid time '{}', use HH:MM or HH:MM:SS",
        time_str
    )))
}

pub fn parse_offset(offset_str: &str) -> Result<FixedOffset> {
    let offset_str = offset_str.trim();
    if offset_str.eq_ignore_ascii_case("z") || offset_str.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }
    offset_str
        .parse::<FixedOffset>()
        .map_err(|_| AttendanceError::invalid(format!("invalid UTC offset '{}'", offset_str)))
}

pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| AttendanceError::invalid(format!("invalid date '{}', use YYYY-MM-DD", date_str)))
}

/// First and last calendar day of a month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || AttendanceError::invalid(format!("invalid month {}-{}", year, month));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_first.pred_opt().ok_or_else(invalid)?;

    Ok((first, last))
}

pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Monday-to-Friday days in `[start, end]`; zero for an empty range.
pub fn count_working_days(start: NaiveDate, end: NaiveDate) -> u32 {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| is_working_day(*day))
        .count() as u32
}

/// Hours between two instants, rounded to two decimals.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let millis = end.signed_duration_since(start).num_milliseconds() as f64;
    round_hours(millis / Duration::hours(1).num_milliseconds() as f64)
}

pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

pub fn format_time_local(datetime: DateTime<Utc>, offset: FixedOffset) -> String {
    datetime.with_timezone(&offset).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_bounds_handles_leap_february_and_december() {
        assert_eq!(month_bounds(2024, 2).unwrap(), (date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(month_bounds(2023, 2).unwrap().1, date(2023, 2, 28));
        assert_eq!(month_bounds(2024, 12).unwrap().1, date(2024, 12, 31));
        assert!(month_bounds(2024, 13).is_err());
        assert!(month_bounds(2024, 0).is_err());
    }

    #[test]
    fn working_days_skip_weekends() {
        // March 2024 starts on a Friday and has 21 weekdays.
        assert_eq!(count_working_days(date(2024, 3, 1), date(2024, 3, 31)), 21);
        // Saturday and Sunday only.
        assert_eq!(count_working_days(date(2024, 3, 2), date(2024, 3, 3)), 0);
        assert_eq!(count_working_days(date(2024, 3, 5), date(2024, 3, 4)), 0);
    }

    #[test]
    fn hours_are_rounded_to_two_decimals() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        assert_eq!(hours_between(start, start + Duration::minutes(75)), 1.25);
        assert_eq!(hours_between(start, start + Duration::minutes(20)), 0.33);
        assert_eq!(hours_between(start, start + Duration::hours(8)), 8.0);
    }

    #[test]
    fn parses_offsets_and_times() {
        assert_eq!(parse_offset("+09:00").unwrap().local_minus_utc(), 9 * 3600);
        assert_eq!(parse_offset("UTC").unwrap().local_minus_utc(), 0);
        assert!(parse_offset("nine").is_err());
        assert_eq!(parse_time_string("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert!(parse_time_string("9.30").is_err());
    }

    #[test]
    fn formats_in_local_offset() {
        let offset = parse_offset("+09:00").unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 3, 4, 0, 15, 0).unwrap();
        assert_eq!(format_time_local(instant, offset), "09:15:00");
    }
}
