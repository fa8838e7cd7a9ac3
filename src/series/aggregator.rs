//! Daily Aggregator
//!
//! Shapes sparse, irregular records into exactly one point per calendar
//! day of a `DateRange`:
//!
//! ```text
//! records → drop out-of-range → bucket by date (combine) → walk range (fill) → stats
//! ```
//!
//! The walk is driven by the range, not by the records, so days without
//! records still appear and extra records never add points.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::range::DateRange;
use crate::series::types::{
    AggregateStats, CombineRule, DailySeries, DailySeriesPoint, FillPolicy, RawMetricRecord,
};

/// Combined value of one day's records
#[derive(Debug, Clone, Copy)]
struct DayBucket {
    value: f64,
    recorded_at: i64,
}

impl DayBucket {
    fn absorb(&mut self, record: &RawMetricRecord, rule: CombineRule) {
        match rule {
            CombineRule::Sum => {
                self.value += record.value;
                self.recorded_at = self.recorded_at.max(record.recorded_at);
            }
            CombineRule::Latest => {
                // Ties go to the record seen last
                if record.recorded_at >= self.recorded_at {
                    self.value = record.value;
                    self.recorded_at = record.recorded_at;
                }
            }
        }
    }
}

impl From<&RawMetricRecord> for DayBucket {
    fn from(record: &RawMetricRecord) -> Self {
        Self {
            value: record.value,
            recorded_at: record.recorded_at,
        }
    }
}

/// Gap-filling daily aggregator for one metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyAggregator {
    combine: CombineRule,
    fill: FillPolicy,
}

impl DailyAggregator {
    pub fn new(combine: CombineRule, fill: FillPolicy) -> Self {
        Self { combine, fill }
    }

    pub fn combine_rule(&self) -> CombineRule {
        self.combine
    }

    pub fn fill_policy(&self) -> FillPolicy {
        self.fill
    }

    /// Build the gap-filled series for `range`
    pub fn aggregate(&self, range: &DateRange, records: &[RawMetricRecord]) -> DailySeries {
        let buckets = self.bucket(range, records);

        let mut points = Vec::with_capacity(usize::try_from(range.span_days()).unwrap_or(0));
        let mut total = 0.0;
        let mut active_days = 0u32;
        let mut previous: Option<f64> = None;

        for date in range.days() {
            let value = match buckets.get(&date) {
                Some(bucket) => {
                    active_days += 1;
                    Some(bucket.value)
                }
                None => match self.fill {
                    FillPolicy::Zero => Some(0.0),
                    FillPolicy::None => None,
                    FillPolicy::CarryForward => previous,
                },
            };

            if let Some(v) = value {
                total += v;
                previous = Some(v);
            }

            points.push(DailySeriesPoint { date, value });
        }

        let average = if active_days > 0 {
            total / f64::from(active_days)
        } else {
            0.0
        };

        DailySeries {
            points,
            stats: AggregateStats {
                total,
                average,
                active_days,
            },
        }
    }

    /// Group in-range records by date, combining same-day values
    fn bucket(
        &self,
        range: &DateRange,
        records: &[RawMetricRecord],
    ) -> BTreeMap<NaiveDate, DayBucket> {
        let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
        let mut dropped = 0usize;

        for record in records {
            if !range.contains(record.date) {
                dropped += 1;
                continue;
            }
            buckets
                .entry(record.date)
                .and_modify(|bucket| bucket.absorb(record, self.combine))
                .or_insert_with(|| DayBucket::from(record));
        }

        if dropped > 0 {
            tracing::debug!(range = %range, dropped, "Ignored records outside range");
        }

        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(from: NaiveDate, to: NaiveDate) -> DateRange {
        DateRange::try_new(from, to).unwrap()
    }

    fn record(d: u32, value: f64, recorded_at: i64) -> RawMetricRecord {
        RawMetricRecord::new(date(2024, 1, d), value, recorded_at)
    }

    fn values(series: &DailySeries) -> Vec<Option<f64>> {
        series.points.iter().map(|p| p.value).collect()
    }

    #[test]
    fn test_zero_fill_example() {
        let aggregator = DailyAggregator::new(CombineRule::Sum, FillPolicy::Zero);
        let series = aggregator.aggregate(
            &range(date(2024, 1, 1), date(2024, 1, 3)),
            &[record(1, 500.0, 1), record(3, 300.0, 2)],
        );

        assert_eq!(values(&series), vec![Some(500.0), Some(0.0), Some(300.0)]);
        assert_eq!(series.points[1].date, date(2024, 1, 2));
        assert_eq!(series.stats.total, 800.0);
        assert_eq!(series.stats.active_days, 2);
        assert_eq!(series.stats.average, 400.0);
    }

    #[test]
    fn test_sum_combines_same_day() {
        let aggregator = DailyAggregator::new(CombineRule::Sum, FillPolicy::Zero);
        let series = aggregator.aggregate(
            &DateRange::single(date(2024, 1, 1)),
            &[record(1, 250.0, 3), record(1, 250.0, 1), record(1, 100.0, 2)],
        );

        assert_eq!(values(&series), vec![Some(600.0)]);
        assert_eq!(series.stats.active_days, 1);
    }

    #[test]
    fn test_latest_wins_by_recency_not_order() {
        let aggregator = DailyAggregator::new(CombineRule::Latest, FillPolicy::None);
        let series = aggregator.aggregate(
            &DateRange::single(date(2024, 1, 1)),
            &[record(1, 71.0, 300), record(1, 70.0, 100), record(1, 72.5, 200)],
        );

        assert_eq!(values(&series), vec![Some(71.0)]);
    }

    #[test]
    fn test_latest_tie_goes_to_later_record() {
        let aggregator = DailyAggregator::new(CombineRule::Latest, FillPolicy::None);
        let series = aggregator.aggregate(
            &DateRange::single(date(2024, 1, 1)),
            &[record(1, 70.0, 100), record(1, 69.0, 100)],
        );

        assert_eq!(values(&series), vec![Some(69.0)]);
    }

    #[test]
    fn test_none_fill_leaves_gaps() {
        let aggregator = DailyAggregator::new(CombineRule::Latest, FillPolicy::None);
        let series = aggregator.aggregate(
            &range(date(2024, 1, 1), date(2024, 1, 4)),
            &[record(2, 70.0, 1), record(4, 69.0, 2)],
        );

        assert_eq!(values(&series), vec![None, Some(70.0), None, Some(69.0)]);
        assert_eq!(series.stats.total, 139.0);
        assert_eq!(series.stats.active_days, 2);
        assert_eq!(series.stats.average, 69.5);
    }

    #[test]
    fn test_carry_forward() {
        let aggregator = DailyAggregator::new(CombineRule::Latest, FillPolicy::CarryForward);
        let series = aggregator.aggregate(
            &range(date(2024, 1, 1), date(2024, 1, 5)),
            &[record(2, 70.0, 1), record(4, 68.0, 2)],
        );

        // Nothing before day 2 to carry, so day 1 stays empty
        assert_eq!(
            values(&series),
            vec![None, Some(70.0), Some(70.0), Some(68.0), Some(68.0)]
        );
        // Carried days are filled but not active
        assert_eq!(series.stats.active_days, 2);
        assert_eq!(series.stats.total, 70.0 + 70.0 + 68.0 + 68.0);
        assert_eq!(series.stats.average, series.stats.total / 2.0);
    }

    #[test]
    fn test_carry_forward_ignores_records_before_range() {
        let aggregator = DailyAggregator::new(CombineRule::Latest, FillPolicy::CarryForward);
        let series = aggregator.aggregate(
            &range(date(2024, 1, 2), date(2024, 1, 3)),
            &[record(1, 70.0, 1)],
        );

        assert_eq!(values(&series), vec![None, None]);
        assert_eq!(series.stats.active_days, 0);
    }

    #[test]
    fn test_out_of_range_records_ignored() {
        let aggregator = DailyAggregator::new(CombineRule::Sum, FillPolicy::Zero);
        let series = aggregator.aggregate(
            &range(date(2024, 1, 2), date(2024, 1, 3)),
            &[record(1, 999.0, 1), record(2, 200.0, 2), record(4, 999.0, 3)],
        );

        assert_eq!(values(&series), vec![Some(200.0), Some(0.0)]);
        assert_eq!(series.stats.total, 200.0);
        assert_eq!(series.stats.active_days, 1);
    }

    #[test]
    fn test_no_records() {
        let aggregator = DailyAggregator::new(CombineRule::Sum, FillPolicy::Zero);
        let series = aggregator.aggregate(&range(date(2024, 1, 1), date(2024, 1, 7)), &[]);

        assert_eq!(series.points.len(), 7);
        assert_eq!(series.stats, AggregateStats::default());
    }

    #[test]
    fn test_zero_recorded_day_is_active() {
        let aggregator = DailyAggregator::new(CombineRule::Sum, FillPolicy::Zero);
        let series = aggregator.aggregate(&DateRange::single(date(2024, 1, 1)), &[record(1, 0.0, 1)]);

        assert_eq!(series.stats.active_days, 1);
        assert_eq!(series.stats.average, 0.0);
    }

    #[test]
    fn test_series_properties_over_month() {
        let aggregator = DailyAggregator::new(CombineRule::Sum, FillPolicy::Zero);
        let full = range(date(2024, 1, 1), date(2024, 1, 31));

        // Records on every third day, two per day, unsorted
        let mut records: Vec<_> = (1..=31)
            .filter(|d| d % 3 == 0)
            .flat_map(|d| vec![record(d, f64::from(d) * 10.0, 2), record(d, 5.0, 1)])
            .collect();
        records.reverse();

        let series = aggregator.aggregate(&full, &records);

        assert_eq!(series.points.len() as i64, full.span_days());
        assert!(series.points.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(series.points.first().unwrap().date, full.from());
        assert_eq!(series.points.last().unwrap().date, full.to());

        let sum: f64 = series.points.iter().filter_map(|p| p.value).sum();
        assert_eq!(sum, series.stats.total);
        assert_eq!(series.stats.active_days, 10);
        assert!(i64::from(series.stats.active_days) <= full.span_days());
    }
}
