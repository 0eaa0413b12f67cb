use super::aggregate::{grand_total, totals_by};
use crate::models::period::TrendPeriod;
use crate::models::time_entry::TimeEntry;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSummary {
    pub total_hours: Decimal,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Calendar days from first to last entry, both included.
    pub span_days: i64,
    /// Distinct dates that have at least one entry.
    pub active_days: usize,
    pub mean_hours_per_day: Decimal,
    pub entry_count: usize,
}

pub fn summarize_time(entries: &[TimeEntry]) -> TimeSummary {
    let total_hours = grand_total(entries.iter().map(|e| &e.duration_hours));
    let days: BTreeSet<NaiveDate> = entries.iter().map(|e| e.date).collect();
    let first_date = days.first().copied();
    let last_date = days.last().copied();

    let span_days = match (first_date, last_date) {
        (Some(first), Some(last)) => (last - first).num_days() + 1,
        _ => 0,
    };
    let mean_hours_per_day = if days.is_empty() {
        Decimal::ZERO
    } else {
        total_hours / Decimal::from(days.len())
    };

    TimeSummary {
        total_hours,
        first_date,
        last_date,
        span_days,
        active_days: days.len(),
        mean_hours_per_day,
        entry_count: entries.len(),
    }
}

pub fn time_by_group(entries: &[TimeEntry]) -> Vec<(String, Decimal)> {
    totals_by(entries, |e| e.group.as_str(), |e| e.duration_hours)
}

/// Hours per bucket, oldest first. Buckets between the first and last entry
/// that have no entries are reported as zero.
pub fn time_trend(entries: &[TimeEntry], period: TrendPeriod) -> Vec<(NaiveDate, Decimal)> {
    let mut buckets: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for entry in entries {
        let total = buckets
            .entry(period.bucket_start(entry.date))
            .or_insert(Decimal::ZERO);
        *total = total.saturating_add(entry.duration_hours);
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    let mut series = Vec::new();
    let mut bucket = first;
    while bucket <= last {
        series.push((bucket, buckets.get(&bucket).copied().unwrap_or(Decimal::ZERO)));
        bucket += period.step();
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry(date: &str, group: &str, hours: Decimal) -> TimeEntry {
        TimeEntry {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("Invalid date"),
            label: group.to_string(),
            duration_hours: hours,
            category: None,
            notes: None,
            group: group.to_string(),
        }
    }

    fn sample_entries() -> Vec<TimeEntry> {
        vec![
            create_test_entry("2024-03-04", "Website", Decimal::new(25, 1)),
            create_test_entry("2024-03-04", "Backend", Decimal::from(1)),
            create_test_entry("2024-03-06", "Website", Decimal::from(3)),
            create_test_entry("2024-03-13", "Admin", Decimal::new(5, 1)),
        ]
    }

    #[test]
    fn test_summarize_time() {
        let summary = summarize_time(&sample_entries());

        assert_eq!(summary.total_hours, Decimal::from(7));
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2024, 3, 4));
        assert_eq!(summary.last_date, NaiveDate::from_ymd_opt(2024, 3, 13));
        assert_eq!(summary.span_days, 10);
        assert_eq!(summary.active_days, 3);
        assert_eq!(summary.mean_hours_per_day.round_dp(2), Decimal::new(233, 2));
        assert_eq!(summary.entry_count, 4);
    }

    #[test]
    fn test_summarize_time_empty() {
        let summary = summarize_time(&[]);
        assert_eq!(summary.total_hours, Decimal::ZERO);
        assert_eq!(summary.first_date, None);
        assert_eq!(summary.span_days, 0);
        assert_eq!(summary.active_days, 0);
        assert_eq!(summary.mean_hours_per_day, Decimal::ZERO);
    }

    #[test]
    fn test_time_by_group_sorted_descending() {
        assert_eq!(
            time_by_group(&sample_entries()),
            vec![
                ("Website".to_string(), Decimal::new(55, 1)),
                ("Backend".to_string(), Decimal::from(1)),
                ("Admin".to_string(), Decimal::new(5, 1)),
            ]
        );
    }

    #[test]
    fn test_daily_trend_fills_gaps() {
        let trend = time_trend(&sample_entries(), TrendPeriod::Daily);

        assert_eq!(trend.len(), 10);
        assert_eq!(trend[0].1, Decimal::new(35, 1));
        assert_eq!(trend[1].1, Decimal::ZERO);
        assert_eq!(trend[2].1, Decimal::from(3));
        assert_eq!(trend[9].1, Decimal::new(5, 1));
        assert!(trend.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_weekly_trend_buckets() {
        let trend = time_trend(&sample_entries(), TrendPeriod::Weekly);

        assert_eq!(
            trend,
            vec![
                (NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), Decimal::new(65, 1)),
                (NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(), Decimal::new(5, 1)),
            ]
        );
    }

    #[test]
    fn test_weekly_trend_seven_days_apart_gives_two_buckets() {
        let entries = vec![
            create_test_entry("2024-03-05", "Ops", Decimal::from(1)),
            create_test_entry("2024-03-12", "Ops", Decimal::from(2)),
        ];
        assert_eq!(time_trend(&entries, TrendPeriod::Weekly).len(), 2);
    }

    #[test]
    fn test_weekly_trend_three_days_apart_same_week_gives_one_bucket() {
        let entries = vec![
            create_test_entry("2024-03-05", "Ops", Decimal::from(1)),
            create_test_entry("2024-03-08", "Ops", Decimal::from(2)),
        ];
        let trend = time_trend(&entries, TrendPeriod::Weekly);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].1, Decimal::from(3));
    }

    #[test]
    fn test_bucket_totals_match_grand_total_for_every_period() {
        let entries = sample_entries();
        let total = summarize_time(&entries).total_hours;

        for period in [TrendPeriod::Daily, TrendPeriod::Weekly] {
            let trend = time_trend(&entries, period);
            assert_eq!(grand_total(trend.iter().map(|(_, v)| v)), total);
        }
        let groups = time_by_group(&entries);
        assert_eq!(grand_total(groups.iter().map(|(_, v)| v)), total);
    }

    #[test]
    fn test_extreme_durations_saturate_instead_of_panicking() {
        let entries = vec![
            create_test_entry("2024-03-04", "Ops", Decimal::MAX),
            create_test_entry("2024-03-05", "Ops", Decimal::MAX),
        ];

        assert_eq!(summarize_time(&entries).total_hours, Decimal::MAX);
        assert_eq!(time_by_group(&entries)[0].1, Decimal::MAX);
        assert_eq!(time_trend(&entries, TrendPeriod::Weekly)[0].1, Decimal::MAX);
    }

    #[test]
    fn test_trend_empty_input() {
        assert!(time_trend(&[], TrendPeriod::Weekly).is_empty());
        assert!(time_by_group(&[]).is_empty());
    }
}
