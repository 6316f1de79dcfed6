use chrono::{DateTime, FixedOffset, Months, NaiveDate, Utc};

/// Placeholder shown on cards when a date or range is unknown
pub const NOT_AVAILABLE: &str = "N/A";

/// Map an instant to its calendar day in the reference offset.
///
/// The same instant always lands on the same day, whatever hour it is fetched at.
pub fn canonical_day(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Split `[start, end]` into consecutive windows no longer than one year.
///
/// Each window starts where the previous one ended and the last one is clipped to `end`.
pub fn year_windows(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut windows = Vec::new();
    let mut from = start;

    while from < end {
        let to = from
            .checked_add_months(Months::new(12))
            .map_or(end, |next| next.min(end));
        windows.push((from, to));
        from = to;
    }

    windows
}

/// Format a date like `Jan 5, 2024`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Format an inclusive date range, or `N/A` when either bound is missing
pub fn format_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => format!("{} - {}", format_date(start), format_date(end)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Format a day as `dd.mm`
pub fn format_day_month(date: NaiveDate) -> String {
    date.format("%d.%m").to_string()
}

/// Human-readable timestamp for card footers, e.g. `19 Oct 2026 14:05`
pub fn format_timestamp(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant
        .with_timezone(&offset)
        .format("%d %b %Y %H:%M")
        .to_string()
}

/// Label for an offset: `UTC` or `UTC+03:00`
pub fn describe_offset(offset: FixedOffset) -> String {
    if offset.local_minus_utc() == 0 {
        "UTC".to_string()
    } else {
        format!("UTC{}", offset)
    }
}
