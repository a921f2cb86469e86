//! Date-expression parsing for due dates
//!
//! Turns free text like `2024-03-15`, `tomorrow`, `next monday` or
//! `in 2 weeks` into a concrete instant, relative to an injected `now`.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeDelta, TimeZone, Weekday};
use regex::Regex;
use thiserror::Error;

/// Date-expression parse failure
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "I couldn't understand that date.\n\
         You can use:\n\
         - calendar dates like '2024-03-15'\n\
         - natural phrases like 'today', 'tomorrow' or 'next monday'\n\
         - relative times like 'in 2 hours', 'in 3 days' or '2 weeks'"
    )]
    InvalidFormat,
}

/// Parse a date expression relative to `now`.
///
/// Rules are tried in order, first match wins:
/// 1. strict `YYYY-MM-DD` calendar date (start of day)
/// 2. `today` / `tomorrow` / `next week` / `next month` (start of day)
/// 3. `next <weekday>`, always strictly after today (start of day)
/// 4. `[in ]<n> <unit>` with unit minute/min, hour/hr, day, week/wk or
///    month; a trailing `s` is allowed. Minute and hour offsets keep the
///    time of day, the rest resolve to start of day.
///
/// Anything else fails with [`ParseError::InvalidFormat`]. A failed parse
/// never falls back to `now`.
pub fn parse<Tz: TimeZone>(input: &str, now: DateTime<Tz>) -> Result<DateTime<Tz>, ParseError> {
    let trimmed = input.trim();
    let tz = now.timezone();
    let today = now.date_naive();

    // Absolute dates first, so "2024-03-15" can never be misread as a
    // relative phrase.
    let absolute_re = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap();
    if let Some(caps) = absolute_re.captures(trimmed) {
        let year: i32 = caps[1].parse().map_err(|_| ParseError::InvalidFormat)?;
        let month: u32 = caps[2].parse().map_err(|_| ParseError::InvalidFormat)?;
        let day: u32 = caps[3].parse().map_err(|_| ParseError::InvalidFormat)?;
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(ParseError::InvalidFormat)?;
        return start_of_day(date, &tz);
    }

    let lowered = trimmed.to_lowercase();

    match lowered.as_str() {
        "today" => return start_of_day(today, &tz),
        "tomorrow" => {
            let date = today.succ_opt().ok_or(ParseError::InvalidFormat)?;
            return start_of_day(date, &tz);
        }
        "next week" => {
            let date = today
                .checked_add_days(Days::new(7))
                .ok_or(ParseError::InvalidFormat)?;
            return start_of_day(date, &tz);
        }
        "next month" => {
            let date = today
                .checked_add_months(Months::new(1))
                .ok_or(ParseError::InvalidFormat)?;
            return start_of_day(date, &tz);
        }
        _ => {}
    }

    if let Some(weekday_name) = lowered.strip_prefix("next ") {
        if let Some(weekday) = parse_weekday(weekday_name) {
            // Strictly future: asking for "next monday" on a Monday means
            // a full week ahead, never today.
            let mut days_ahead = u64::from(
                (weekday.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7,
            );
            if days_ahead == 0 {
                days_ahead = 7;
            }
            let date = today
                .checked_add_days(Days::new(days_ahead))
                .ok_or(ParseError::InvalidFormat)?;
            return start_of_day(date, &tz);
        }
    }

    let offset_re = Regex::new(r"^(?:in\s+)?(\d+)\s+([a-z]+)$").unwrap();
    if let Some(caps) = offset_re.captures(&lowered) {
        // Out-of-range quantities fall through to the generic failure.
        let amount: i64 = caps[1].parse().map_err(|_| ParseError::InvalidFormat)?;
        let unit = caps[2].strip_suffix('s').unwrap_or(&caps[2]);

        return match unit {
            "minute" | "min" => {
                let delta = TimeDelta::try_minutes(amount).ok_or(ParseError::InvalidFormat)?;
                now.checked_add_signed(delta).ok_or(ParseError::InvalidFormat)
            }
            "hour" | "hr" => {
                let delta = TimeDelta::try_hours(amount).ok_or(ParseError::InvalidFormat)?;
                now.checked_add_signed(delta).ok_or(ParseError::InvalidFormat)
            }
            "day" => {
                let days = u64::try_from(amount).map_err(|_| ParseError::InvalidFormat)?;
                let date = today
                    .checked_add_days(Days::new(days))
                    .ok_or(ParseError::InvalidFormat)?;
                start_of_day(date, &tz)
            }
            "week" | "wk" => {
                let days = u64::try_from(amount)
                    .ok()
                    .and_then(|n| n.checked_mul(7))
                    .ok_or(ParseError::InvalidFormat)?;
                let date = today
                    .checked_add_days(Days::new(days))
                    .ok_or(ParseError::InvalidFormat)?;
                start_of_day(date, &tz)
            }
            "month" => {
                let months = u32::try_from(amount).map_err(|_| ParseError::InvalidFormat)?;
                let date = today
                    .checked_add_months(Months::new(months))
                    .ok_or(ParseError::InvalidFormat)?;
                start_of_day(date, &tz)
            }
            _ => Err(ParseError::InvalidFormat),
        };
    }

    Err(ParseError::InvalidFormat)
}

/// First instant of `date` in `tz`. A nonexistent local midnight (DST gap)
/// resolves to the earliest valid instant of that day.
fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<DateTime<Tz>, ParseError> {
    let midnight = date.and_hms_opt(0, 0, 0).ok_or(ParseError::InvalidFormat)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .ok_or(ParseError::InvalidFormat)
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    // 2024-03-15 was a Friday.
    fn friday_afternoon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap()
    }

    fn day_start(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_absolute_date_ignores_now() {
        let expected = day_start(2025, 12, 24);
        assert_eq!(parse("2025-12-24", friday_afternoon()), Ok(expected));
        assert_eq!(
            parse("2025-12-24", day_start(1999, 1, 1)),
            Ok(expected),
            "absolute dates must not depend on now"
        );
    }

    #[test]
    fn test_absolute_date_must_be_valid_calendar_day() {
        assert_eq!(
            parse("2024-02-31", friday_afternoon()),
            Err(ParseError::InvalidFormat)
        );
        assert_eq!(
            parse("2024-13-01", friday_afternoon()),
            Err(ParseError::InvalidFormat)
        );
    }

    #[test]
    fn test_absolute_date_requires_strict_format() {
        assert_eq!(
            parse("2024-3-15", friday_afternoon()),
            Err(ParseError::InvalidFormat)
        );
        assert_eq!(
            parse("24-03-15", friday_afternoon()),
            Err(ParseError::InvalidFormat)
        );
    }

    #[test]
    fn test_today_and_tomorrow() {
        let now = friday_afternoon();
        assert_eq!(parse("today", now), Ok(day_start(2024, 3, 15)));
        assert_eq!(parse("tomorrow", now), Ok(day_start(2024, 3, 16)));
        assert_eq!(parse("TOMORROW", now), Ok(day_start(2024, 3, 16)));
    }

    #[test]
    fn test_tomorrow_equals_in_1_day_plural_or_not() {
        let now = friday_afternoon();
        let tomorrow = parse("tomorrow", now).unwrap();
        assert_eq!(parse("in 1 day", now).unwrap(), tomorrow);
        assert_eq!(parse("in 1 days", now).unwrap(), tomorrow);
        assert_eq!(tomorrow, day_start(2024, 3, 16));
    }

    #[test]
    fn test_next_week_and_month() {
        let now = friday_afternoon();
        assert_eq!(parse("next week", now), Ok(day_start(2024, 3, 22)));
        assert_eq!(parse("next month", now), Ok(day_start(2024, 4, 15)));
    }

    #[test]
    fn test_next_month_clamps_day() {
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 9, 0, 0).unwrap();
        assert_eq!(parse("next month", now), Ok(day_start(2024, 2, 29)));
    }

    #[test]
    fn test_next_weekday_is_strictly_future() {
        // 2024-03-18 is a Monday; "next monday" from a Monday is a full
        // week out, never the same day.
        let monday = Utc.with_ymd_and_hms(2024, 3, 18, 8, 0, 0).unwrap();
        assert_eq!(parse("next monday", monday), Ok(day_start(2024, 3, 25)));
    }

    #[test]
    fn test_next_weekday_midweek() {
        let now = friday_afternoon();
        assert_eq!(parse("next monday", now), Ok(day_start(2024, 3, 18)));
        assert_eq!(parse("next saturday", now), Ok(day_start(2024, 3, 16)));
        assert_eq!(parse("Next Thursday", now), Ok(day_start(2024, 3, 21)));
    }

    #[test]
    fn test_minute_and_hour_offsets_keep_time_of_day() {
        let now = friday_afternoon();
        assert_eq!(
            parse("in 90 minutes", now),
            Ok(Utc.with_ymd_and_hms(2024, 3, 15, 16, 0, 0).unwrap())
        );
        assert_eq!(
            parse("in 2 hours", now),
            Ok(Utc.with_ymd_and_hms(2024, 3, 15, 16, 30, 0).unwrap())
        );
        assert_eq!(
            parse("45 min", now),
            Ok(Utc.with_ymd_and_hms(2024, 3, 15, 15, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_day_week_month_offsets_resolve_to_start_of_day() {
        let now = friday_afternoon();
        assert_eq!(parse("in 3 days", now), Ok(day_start(2024, 3, 18)));
        assert_eq!(parse("2 weeks", now), Ok(day_start(2024, 3, 29)));
        assert_eq!(parse("1 wk", now), Ok(day_start(2024, 3, 22)));
        assert_eq!(parse("in 2 months", now), Ok(day_start(2024, 5, 15)));
    }

    #[test]
    fn test_offset_without_in_prefix() {
        let now = friday_afternoon();
        assert_eq!(parse("3 days", now), parse("in 3 days", now));
        assert_eq!(parse("4 hrs", now), parse("in 4 hours", now));
    }

    #[test]
    fn test_invalid_expressions() {
        let now = friday_afternoon();
        for input in [
            "",
            "soon",
            "in five days",
            "in 2",
            "2 fortnights",
            "next caturday",
            "in -2 days",
        ] {
            assert_eq!(parse(input, now), Err(ParseError::InvalidFormat), "{input}");
        }
    }

    #[test]
    fn test_out_of_range_quantity_is_invalid_format() {
        let now = friday_afternoon();
        assert_eq!(
            parse("99999999999999999999 days", now),
            Err(ParseError::InvalidFormat)
        );
        assert_eq!(
            parse("in 9999999999 months", now),
            Err(ParseError::InvalidFormat)
        );
    }

    #[test]
    fn test_error_message_lists_supported_forms() {
        let msg = ParseError::InvalidFormat.to_string();
        assert!(msg.contains("2024-03-15"));
        assert!(msg.contains("tomorrow"));
        assert!(msg.contains("in 2 hours"));
    }
}
