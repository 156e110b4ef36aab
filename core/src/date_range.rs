//! Date range summary: the calendar months an alert population covers.
//!
//! Rendered as "first day of earliest month - last day of latest month",
//! both as MM/DD/YYYY, and broadcast to every tracker row.

use crate::alert::AlertTable;
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

pub fn parse_alert_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    first_of_month(date)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Month-aligned span covering every date, or `None` for no dates.
pub fn month_span(dates: impl IntoIterator<Item = NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    let (earliest, latest) = dates.into_iter().fold(None, |span, d| match span {
        None => Some((d, d)),
        Some((lo, hi)) => Some((d.min(lo), d.max(hi))),
    })?;
    Some((first_of_month(earliest)?, last_of_month(latest)?))
}

pub fn format_span(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", start.format("%m/%d/%Y"), end.format("%m/%d/%Y"))
}

/// Date range label for an alert table. Unparsable dates are skipped.
pub fn date_range_label(alerts: &AlertTable) -> Option<String> {
    let mut skipped = 0usize;
    let dates: Vec<NaiveDate> = alerts
        .alerts()
        .iter()
        .filter_map(|a| a.alert_date.as_deref())
        .filter_map(|raw| {
            let parsed = parse_alert_date(raw);
            if parsed.is_none() {
                skipped += 1;
            }
            parsed
        })
        .collect();

    if skipped > 0 {
        log::warn!("{skipped} alert dates could not be parsed and were skipped");
    }

    month_span(dates).map(|(start, end)| format_span(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_date_shapes() {
        assert_eq!(parse_alert_date("2023-05-17"), Some(ymd(2023, 5, 17)));
        assert_eq!(parse_alert_date("05/17/2023"), Some(ymd(2023, 5, 17)));
        assert_eq!(parse_alert_date("2023-05-17 13:45:00"), Some(ymd(2023, 5, 17)));
        assert_eq!(parse_alert_date("2023-05-17T13:45:00"), Some(ymd(2023, 5, 17)));
        assert_eq!(parse_alert_date("not a date"), None);
    }

    #[test]
    fn span_is_month_aligned() {
        let span = month_span([ymd(2022, 6, 14), ymd(2023, 2, 3), ymd(2022, 11, 30)]).unwrap();
        assert_eq!(span, (ymd(2022, 6, 1), ymd(2023, 2, 28)));
        assert_eq!(format_span(span.0, span.1), "06/01/2022 - 02/28/2023");
    }

    #[test]
    fn leap_february_and_december_end_correctly() {
        assert_eq!(last_of_month(ymd(2024, 2, 10)), Some(ymd(2024, 2, 29)));
        assert_eq!(last_of_month(ymd(2023, 12, 5)), Some(ymd(2023, 12, 31)));
    }

    #[test]
    fn no_dates_no_span() {
        assert_eq!(month_span(Vec::new()), None);
    }
}
