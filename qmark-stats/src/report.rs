//! Chart-ready series built from an [`AggregationSnapshot`]: pie slices per author and a daily time series.

use crate::aggregate::AggregationSnapshot;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::cmp::Reverse;

pub const OTHER_LABEL: &str = "Other";

/// Fixed divisor for slice annotations (`100 * value / 70`). It is not the series total.
pub const ANNOTATION_DIVISOR: u64 = 70;

/// Window used by `history` when no argument is given.
pub const DEFAULT_WINDOW: &str = "14";

/// Window used when the argument is neither `all` nor a non-negative integer.
pub const FALLBACK_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
}

/// Slices sorted by value descending, with the "Other" slice always last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSeries {
    pub slices: Vec<PieSlice>,
}

impl PieSeries {
    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    pub fn other(&self) -> Option<&PieSlice> {
        self.slices.last().filter(|s| s.label == OTHER_LABEL)
    }
}

/// Label annotation for a slice: `100 * value / 70`, rounded to nearest.
pub fn slice_annotation(value: u64) -> u64 {
    (200 * value + ANNOTATION_DIVISOR) / (2 * ANNOTATION_DIVISOR)
}

/// Authors with strictly more than 1% of `total` get their own slice; the rest fold into "Other".
/// Ties on count are ordered by author id ascending.
pub fn compose_pie(snapshot: &AggregationSnapshot) -> PieSeries {
    let total = snapshot.total;

    let mut kept: Vec<(i64, &str, u64)> = snapshot
        .authors
        .iter()
        .filter(|(_, tally)| tally.count * 100 > total)
        .map(|(id, tally)| (id, tally.display_name.as_str(), tally.count))
        .collect();
    kept.sort_by_key(|(id, _, count)| (Reverse(*count), *id));

    let kept_total: u64 = kept.iter().map(|(_, _, count)| count).sum();

    let mut slices: Vec<PieSlice> = kept
        .into_iter()
        .map(|(_, label, value)| PieSlice {
            label: label.to_string(),
            value,
        })
        .collect();
    slices.push(PieSlice {
        label: OTHER_LABEL.to_string(),
        value: total - kept_total,
    });

    PieSeries { slices }
}

/// Trailing-day window for the time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    All,
    Days(u32),
}

impl Window {
    /// `"all"` selects everything; a non-negative integer selects that many trailing days;
    /// anything else falls back to [`FALLBACK_WINDOW_DAYS`].
    pub fn parse(arg: &str) -> Self {
        let arg = arg.trim();
        if arg == "all" {
            return Window::All;
        }
        match arg.parse::<u32>() {
            Ok(days) => Window::Days(days),
            Err(_) => Window::Days(FALLBACK_WINDOW_DAYS),
        }
    }

    /// Exclusive lower bound on dates, or `None` when nothing is filtered.
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Window::All => None,
            Window::Days(days) => today.checked_sub_signed(Duration::days(i64::from(*days))),
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Window::parse(DEFAULT_WINDOW)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub count: u64,
}

/// Points in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeSeries {
    pub points: Vec<TimePoint>,
}

impl TimeSeries {
    pub fn total(&self) -> u64 {
        self.points.iter().map(|p| p.count).sum()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Daily counts with dates strictly after `today - window`. `today` is a UTC date.
pub fn compose_time_series(
    snapshot: &AggregationSnapshot,
    window: Window,
    today: NaiveDate,
) -> TimeSeries {
    let cutoff = window.cutoff(today);
    let points = snapshot
        .dates
        .iter()
        .filter(|(date, _)| cutoff.map_or(true, |c| *date > c))
        .map(|(date, count)| TimePoint { date, count })
        .collect();
    TimeSeries { points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use crate::classify::Classified;
    use chrono::{DateTime, TimeZone, Utc};
    use qmark_core::{Author, Chat, ChatType, Message, MessageKind};

    fn valid(id: i32, author_id: i64, name: &str, at: DateTime<Utc>) -> Classified {
        Classified::new(Message {
            id,
            chat: Chat::new(-100, ChatType::Supergroup),
            author: Author {
                id: author_id,
                display_name: name.to_string(),
            },
            content: "?".to_string(),
            kind: MessageKind::Default,
            created_at: at,
            edited_at: None,
        })
    }

    fn snapshot_with_counts(counts: &[(i64, &str, u64)]) -> AggregationSnapshot {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut agg = Aggregator::new();
        let mut id = 0;
        for (author_id, name, n) in counts {
            for _ in 0..*n {
                id += 1;
                agg.push(&valid(id, *author_id, name, at));
            }
        }
        agg.finish()
    }

    #[test]
    fn test_pie_keeps_all_when_everyone_above_threshold() {
        let snapshot = snapshot_with_counts(&[(3, "C", 1), (1, "A", 7), (2, "B", 2)]);
        let pie = compose_pie(&snapshot);
        let got: Vec<(&str, u64)> = pie.slices.iter().map(|s| (s.label.as_str(), s.value)).collect();
        assert_eq!(got, vec![("A", 7), ("B", 2), ("C", 1), ("Other", 0)]);
        assert_eq!(pie.total(), 10);
    }

    #[test]
    fn test_pie_folds_authors_at_or_below_one_percent() {
        // total 200: threshold is 2, so an author with exactly 2 is folded.
        let snapshot = snapshot_with_counts(&[(1, "big", 195), (2, "edge", 2), (3, "tiny", 1), (4, "ok", 2)]);
        assert_eq!(snapshot.total, 200);
        let pie = compose_pie(&snapshot);
        let got: Vec<(&str, u64)> = pie.slices.iter().map(|s| (s.label.as_str(), s.value)).collect();
        assert_eq!(got, vec![("big", 195), ("Other", 5)]);
        assert_eq!(pie.total(), snapshot.total);
    }

    #[test]
    fn test_pie_ties_ordered_by_author_id() {
        let snapshot = snapshot_with_counts(&[(30, "z", 4), (10, "y", 4), (20, "x", 4)]);
        let pie = compose_pie(&snapshot);
        let labels: Vec<&str> = pie.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["y", "x", "z", "Other"]);
    }

    #[test]
    fn test_pie_of_empty_snapshot_is_single_zero_other() {
        let pie = compose_pie(&AggregationSnapshot::default());
        assert_eq!(pie.slices.len(), 1);
        assert_eq!(pie.other().unwrap().value, 0);
        assert_eq!(pie.total(), 0);
    }

    #[test]
    fn test_slice_annotation_uses_fixed_divisor() {
        assert_eq!(slice_annotation(0), 0);
        assert_eq!(slice_annotation(7), 10);
        assert_eq!(slice_annotation(70), 100);
        assert_eq!(slice_annotation(1), 1); // 1.43
        assert_eq!(slice_annotation(2), 3); // 2.86
        assert_eq!(slice_annotation(140), 200);
    }

    #[test]
    fn test_window_parse() {
        assert_eq!(Window::parse("all"), Window::All);
        assert_eq!(Window::parse("30"), Window::Days(30));
        assert_eq!(Window::parse(" 30 "), Window::Days(30));
        assert_eq!(Window::parse("0"), Window::Days(0));
        assert_eq!(Window::parse("notanumber"), Window::Days(7));
        assert_eq!(Window::parse("-3"), Window::Days(7));
        assert_eq!(Window::parse("ALL"), Window::Days(7));
        assert_eq!(Window::default(), Window::Days(14));
    }

    #[test]
    fn test_time_series_all_has_one_point_per_date() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let mut agg = Aggregator::new();
        for i in 0..30 {
            agg.push(&valid(i, 1, "a", base + Duration::days((i % 10) as i64)));
        }
        let snapshot = agg.finish();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let series = compose_time_series(&snapshot, Window::All, today);
        assert_eq!(series.len(), 10);
        assert_eq!(series.total(), 30);
        assert!(series.points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_time_series_window_excludes_cutoff_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let mut agg = Aggregator::new();
        for back in 0..20i64 {
            let date = today - Duration::days(back);
            let at = Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap());
            agg.push(&valid(back as i32, 1, "a", at));
        }
        let snapshot = agg.finish();

        let series = compose_time_series(&snapshot, Window::Days(14), today);
        let cutoff = today - Duration::days(14);
        assert_eq!(series.len(), 14);
        assert!(series.points.iter().all(|p| p.date > cutoff));
        assert_eq!(series.points.first().unwrap().date, cutoff + Duration::days(1));
        assert_eq!(series.points.last().unwrap().date, today);

        let filtered_total: u64 = snapshot
            .dates
            .iter()
            .filter(|(d, _)| *d > cutoff)
            .map(|(_, c)| c)
            .sum();
        assert_eq!(series.total(), filtered_total);
    }

    #[test]
    fn test_time_series_empty_is_ok() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let series = compose_time_series(&AggregationSnapshot::default(), Window::Days(7), today);
        assert!(series.is_empty());
        let series = compose_time_series(&AggregationSnapshot::default(), Window::All, today);
        assert!(series.is_empty());
    }

    #[test]
    fn test_zero_day_window_is_empty_even_for_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let at = Utc.from_utc_datetime(&today.and_hms_opt(9, 0, 0).unwrap());
        let mut agg = Aggregator::new();
        agg.push(&valid(1, 1, "a", at));
        let series = compose_time_series(&agg.finish(), Window::Days(0), today);
        assert!(series.is_empty());
    }

    #[test]
    fn test_huge_window_behaves_like_all() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let at = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
        let mut agg = Aggregator::new();
        agg.push(&valid(1, 1, "a", at));
        let series = compose_time_series(&agg.finish(), Window::Days(u32::MAX), today);
        assert_eq!(series.len(), 1);
    }
}
