//! Business-day window generation.
//!
//! Walks backward from an anchor date, skipping weekends, and splits the
//! collected days into a target window and a history window.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use tracing::debug;

use crate::models::{DateWindow, DayInterval};

// ── generate_windows ──────────────────────────────────────────────────────────

/// Build the `(target, history)` windows ending at `anchor`.
///
/// Collects `target_count + history_count` days walking backward from
/// `anchor`. A candidate that falls on a Sunday is moved back two days, one on
/// a Saturday is moved back one day. The moved candidate is not re-checked.
///
/// Both windows are ordered from most recent to oldest.
///
/// ```
/// use chrono::NaiveDate;
/// use errwatch_core::business_days::generate_windows;
///
/// let tuesday = NaiveDate::from_ymd_opt(2018, 4, 10).unwrap();
/// let (target, history) = generate_windows(tuesday, 1, 2);
/// assert_eq!(target[0].date(), tuesday);
/// assert_eq!(history[0].date(), NaiveDate::from_ymd_opt(2018, 4, 9).unwrap());
/// assert_eq!(history[1].date(), NaiveDate::from_ymd_opt(2018, 4, 6).unwrap());
/// ```
pub fn generate_windows(
    anchor: NaiveDate,
    target_count: usize,
    history_count: usize,
) -> (DateWindow, DateWindow) {
    let days_count = target_count + history_count;
    let mut report_dates: DateWindow = Vec::with_capacity(days_count);
    let mut days_look_back: i64 = 0;

    while report_dates.len() < days_count {
        let candidate = anchor + Duration::days(days_look_back);

        let adjustment = match candidate.weekday() {
            Weekday::Sun => 2,
            Weekday::Sat => 1,
            _ => 0,
        };
        days_look_back -= adjustment;

        let report_date = anchor + Duration::days(days_look_back);
        report_dates.push(DayInterval::for_date(report_date));

        days_look_back -= 1;
    }

    let history = report_dates.split_off(target_count.min(report_dates.len()));

    debug!(
        anchor = %anchor,
        target_days = report_dates.len(),
        history_days = history.len(),
        "generated report windows"
    );

    (report_dates, history)
}

/// Same as [`generate_windows`], ignoring the time of day of `anchor`.
pub fn generate_windows_at(
    anchor: NaiveDateTime,
    target_count: usize,
    history_count: usize,
) -> (DateWindow, DateWindow) {
    generate_windows(anchor.date(), target_count, history_count)
}

/// `true` for Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(window: &DateWindow) -> Vec<NaiveDate> {
        window.iter().map(DayInterval::date).collect()
    }

    // ── fixed scenarios ──────────────────────────────────────────────────────

    #[test]
    fn test_windows_anchor_on_saturday() {
        let (target, history) = generate_windows(date(2018, 4, 7), 1, 5);

        assert_eq!(dates(&target), vec![date(2018, 4, 6)]);
        assert_eq!(
            dates(&history),
            vec![
                date(2018, 4, 5),
                date(2018, 4, 4),
                date(2018, 4, 3),
                date(2018, 4, 2),
                date(2018, 3, 30),
            ]
        );
    }

    #[test]
    fn test_windows_anchor_on_tuesday() {
        let (target, history) = generate_windows(date(2018, 4, 10), 1, 5);

        assert_eq!(dates(&target), vec![date(2018, 4, 10)]);
        assert_eq!(
            dates(&history),
            vec![
                date(2018, 4, 9),
                date(2018, 4, 6),
                date(2018, 4, 5),
                date(2018, 4, 4),
                date(2018, 4, 3),
            ]
        );
    }

    #[test]
    fn test_windows_anchor_on_sunday() {
        let (target, history) = generate_windows(date(2018, 4, 8), 1, 1);
        assert_eq!(dates(&target), vec![date(2018, 4, 6)]);
        assert_eq!(dates(&history), vec![date(2018, 4, 5)]);
    }

    #[test]
    fn test_windows_intervals_span_full_day() {
        let (target, _) = generate_windows(date(2018, 4, 10), 1, 0);
        let interval = target[0];
        assert_eq!(interval.start, date(2018, 4, 10).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(interval.end, date(2018, 4, 10).and_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn test_windows_time_of_day_ignored() {
        let anchor = date(2018, 4, 7).and_hms_opt(15, 0, 0).unwrap();
        let (from_datetime, _) = generate_windows_at(anchor, 1, 5);
        let (from_date, _) = generate_windows(date(2018, 4, 7), 1, 5);
        assert_eq!(from_datetime, from_date);
    }

    #[test]
    fn test_windows_empty_history() {
        let (target, history) = generate_windows(date(2018, 4, 10), 3, 0);
        assert_eq!(target.len(), 3);
        assert!(history.is_empty());
    }

    // ── properties over many anchors ─────────────────────────────────────────

    #[test]
    fn test_windows_never_contain_weekends() {
        let start = date(2017, 12, 1);
        for offset in 0..120 {
            let anchor = start + Duration::days(offset);
            let (target, history) = generate_windows(anchor, 2, 10);
            for interval in target.iter().chain(history.iter()) {
                assert!(
                    !is_weekend(interval.date()),
                    "anchor {anchor} produced weekend date {}",
                    interval.date()
                );
            }
        }
    }

    #[test]
    fn test_windows_lengths_order_and_uniqueness() {
        let start = date(2018, 1, 1);
        for offset in 0..60 {
            let anchor = start + Duration::days(offset);
            let (target, history) = generate_windows(anchor, 3, 7);

            assert_eq!(target.len(), 3);
            assert_eq!(history.len(), 7);

            let all: Vec<NaiveDate> = target
                .iter()
                .chain(history.iter())
                .map(DayInterval::date)
                .collect();
            assert!(all.windows(2).all(|w| w[0] > w[1]), "not descending: {all:?}");

            let unique: HashSet<NaiveDate> = all.iter().copied().collect();
            assert_eq!(unique.len(), all.len());
            assert!(all[0] <= anchor);
        }
    }

    #[test]
    fn test_is_weekend() {
        assert!(is_weekend(date(2018, 4, 7)));
        assert!(is_weekend(date(2018, 4, 8)));
        assert!(!is_weekend(date(2018, 4, 9)));
        assert!(!is_weekend(date(2018, 4, 6)));
    }
}
