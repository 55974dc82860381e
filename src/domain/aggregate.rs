//! Groups 3-hour forecast samples into per-day summaries.

use std::{collections::BTreeMap, ops::RangeInclusive};

use chrono::{FixedOffset, NaiveDate};

use crate::domain::weather::{
    DailySummary, ForecastSample, LocaleLabels, default_offset, pop_percent,
};

pub const MAX_DAYS: usize = 7;

const DAY_WINDOW: RangeInclusive<u32> = 6..=18;
const NOON_WINDOW: RangeInclusive<u32> = 11..=13;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastAggregator {
    offset: FixedOffset,
    labels: LocaleLabels,
}

impl Default for ForecastAggregator {
    fn default() -> Self {
        Self::new(default_offset(), LocaleLabels::ENGLISH)
    }
}

impl ForecastAggregator {
    pub fn new(offset: FixedOffset, labels: LocaleLabels) -> Self {
        Self { offset, labels }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn labels(&self) -> LocaleLabels {
        self.labels
    }

    /// Buckets by local calendar date and summarizes the earliest [`MAX_DAYS`] days.
    ///
    /// Empty input yields an empty result.
    pub fn aggregate(&self, samples: &[ForecastSample]) -> Vec<DailySummary> {
        let mut buckets: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
        for sample in samples {
            buckets
                .entry(sample.local_date(self.offset))
                .or_default()
                .push(sample);
        }

        buckets
            .into_iter()
            .take(MAX_DAYS)
            .filter_map(|(date, bucket)| self.summarize(date, &bucket))
            .collect()
    }

    fn summarize(&self, date: NaiveDate, bucket: &[&ForecastSample]) -> Option<DailySummary> {
        let temp_max_c = max_of(bucket.iter().map(|s| s.temperature_c))?;
        let temp_min_c = min_of(bucket.iter().map(|s| s.temperature_c))?;

        let day_max_c = max_of(
            bucket
                .iter()
                .filter(|s| self.in_day_window(s))
                .map(|s| s.temperature_c),
        )
        .unwrap_or(temp_max_c);
        let night_min_c = min_of(
            bucket
                .iter()
                .filter(|s| !self.in_day_window(s))
                .map(|s| s.temperature_c),
        )
        .unwrap_or(temp_min_c);

        let representative = self.representative(bucket)?.clone();

        Some(DailySummary {
            date,
            weekday: self.labels.weekday(date),
            temp_max_c,
            temp_min_c,
            day_max_c,
            night_min_c,
            description: representative
                .description
                .clone()
                .unwrap_or_else(|| self.labels.unknown.to_string()),
            icon: representative.icon.clone(),
            feels_like_c: representative.feels_like_c,
            humidity: representative.humidity,
            wind_speed_ms: representative.wind_speed_ms,
            wind_deg: representative.wind_deg,
            precipitation_percent: pop_percent(representative.pop),
            representative,
        })
    }

    /// First sample between 11:00 and 13:00, else the middle sample.
    fn representative<'a>(&self, bucket: &[&'a ForecastSample]) -> Option<&'a ForecastSample> {
        bucket
            .iter()
            .copied()
            .find(|s| NOON_WINDOW.contains(&s.local_hour(self.offset)))
            .or_else(|| bucket.get(bucket.len() / 2).copied())
    }

    fn in_day_window(&self, sample: &ForecastSample) -> bool {
        DAY_WINDOW.contains(&sample.local_hour(self.offset))
    }
}

/// Aggregates with the default UTC+8 offset and English labels.
pub fn aggregate(samples: &[ForecastSample]) -> Vec<DailySummary> {
    ForecastAggregator::default().aggregate(samples)
}

fn max_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
}

fn min_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDateTime, TimeZone, Utc};

    use super::*;

    fn sample(local: &str, temp: f64) -> ForecastSample {
        let naive = NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M").unwrap();
        let time = default_offset()
            .from_local_datetime(&naive)
            .unwrap()
            .with_timezone(&Utc);
        ForecastSample {
            time,
            temperature_c: temp,
            feels_like_c: Some(temp - 1.0),
            humidity: Some(60.0),
            wind_speed_ms: Some(3.0),
            wind_deg: Some(90.0),
            pop: 0.2,
            description: Some(format!("sky at {local}")),
            icon: Some("01d".to_string()),
        }
    }

    #[test]
    fn two_day_scenario_matches_hand_computed_values() {
        let samples = vec![
            sample("2024-03-01T00:00", 5.0),
            sample("2024-03-01T06:00", 10.0),
            sample("2024-03-01T12:00", 18.0),
            sample("2024-03-01T18:00", 9.0),
            sample("2024-03-02T00:00", 4.0),
            sample("2024-03-02T12:00", 16.0),
        ];

        let days = aggregate(&samples);
        assert_eq!(days.len(), 2);

        let first = &days[0];
        assert_eq!(first.date_label(), "2024-03-01");
        assert_eq!(first.weekday, "Fri");
        assert_eq!(first.temp_max_c, 18.0);
        assert_eq!(first.temp_min_c, 5.0);
        assert_eq!(first.day_max_c, 18.0);
        assert_eq!(first.night_min_c, 5.0);
        assert_eq!(first.representative.temperature_c, 18.0);
        assert_eq!(first.description, "sky at 2024-03-01T12:00");

        let second = &days[1];
        assert_eq!(second.date_label(), "2024-03-02");
        assert_eq!(second.temp_max_c, 16.0);
        assert_eq!(second.temp_min_c, 4.0);
        assert_eq!(second.day_max_c, 16.0);
        assert_eq!(second.night_min_c, 4.0);
    }

    #[test]
    fn day_window_falls_back_to_overall_max() {
        let samples = vec![
            sample("2024-03-01T00:00", 3.0),
            sample("2024-03-01T03:00", 7.0),
            sample("2024-03-01T21:00", 5.0),
        ];
        let day = &aggregate(&samples)[0];
        assert_eq!(day.day_max_c, 7.0);
        assert_eq!(day.night_min_c, 3.0);
    }

    #[test]
    fn night_window_falls_back_to_overall_min() {
        let samples = vec![
            sample("2024-03-01T06:00", 8.0),
            sample("2024-03-01T09:00", 11.0),
            sample("2024-03-01T15:00", 14.0),
            sample("2024-03-01T18:00", 10.0),
        ];
        let day = &aggregate(&samples)[0];
        assert_eq!(day.night_min_c, 8.0);
        assert_eq!(day.day_max_c, 14.0);
    }

    #[test]
    fn hour_nineteen_counts_as_night() {
        let samples = vec![
            sample("2024-03-01T12:00", 15.0),
            sample("2024-03-01T19:00", 2.0),
            sample("2024-03-01T18:00", 20.0),
        ];
        let day = &aggregate(&samples)[0];
        assert_eq!(day.day_max_c, 20.0);
        assert_eq!(day.night_min_c, 2.0);
    }

    #[test]
    fn representative_prefers_first_midday_sample() {
        let samples = vec![
            sample("2024-03-01T09:00", 9.0),
            sample("2024-03-01T11:00", 11.0),
            sample("2024-03-01T12:00", 12.0),
            sample("2024-03-01T15:00", 15.0),
        ];
        let day = &aggregate(&samples)[0];
        assert_eq!(day.representative.temperature_c, 11.0);
    }

    #[test]
    fn representative_falls_back_to_middle_index() {
        let samples = vec![
            sample("2024-03-01T00:00", 1.0),
            sample("2024-03-01T03:00", 2.0),
            sample("2024-03-01T06:00", 3.0),
            sample("2024-03-01T09:00", 4.0),
        ];
        let day = &aggregate(&samples)[0];
        assert_eq!(day.representative.temperature_c, 3.0);
    }

    #[test]
    fn missing_description_and_wind_use_placeholders() {
        let mut noon = sample("2024-03-01T12:00", 12.0);
        noon.description = None;
        noon.wind_speed_ms = None;
        noon.wind_deg = None;
        noon.pop = 0.456;

        let chinese = ForecastAggregator::new(default_offset(), LocaleLabels::CHINESE);
        let day = &chinese.aggregate(&[noon])[0];
        assert_eq!(day.description, "未知");
        assert_eq!(day.weekday, "周五");
        assert_eq!(day.wind_speed_ms, None);
        assert_eq!(day.precipitation_percent, 46);
    }

    #[test]
    fn caps_at_seven_earliest_days() {
        let samples: Vec<_> = (1..=9)
            .rev()
            .map(|day| sample(&format!("2024-03-{day:02}T12:00"), f64::from(day)))
            .collect();
        let days = aggregate(&samples);
        assert_eq!(days.len(), MAX_DAYS);
        assert_eq!(days[0].date_label(), "2024-03-01");
        assert_eq!(days[6].date_label(), "2024-03-07");
    }

    #[test]
    fn buckets_use_fixed_offset_dates() {
        let late_utc = ForecastSample {
            time: Utc.with_ymd_and_hms(2024, 3, 1, 16, 0, 0).unwrap(),
            ..sample("2024-03-01T00:00", 1.0)
        };
        let days = aggregate(&[late_utc]);
        assert_eq!(days[0].date_label(), "2024-03-02");
        assert_eq!(days[0].night_min_c, 1.0);
    }

    #[test]
    fn empty_input_yields_no_days() {
        assert!(aggregate(&[]).is_empty());
    }
}
