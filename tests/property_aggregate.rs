mod common;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use weather_report::domain::{
    aggregate::{MAX_DAYS, aggregate},
    weather::default_offset,
};

fn samples_from(offsets: &[(u32, u32, i16)]) -> Vec<weather_report::domain::weather::ForecastSample> {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
    let mut samples = offsets
        .iter()
        .map(|&(day, slot, temp)| {
            let date = start + Duration::days(i64::from(day));
            let local = format!("{}T{:02}:00", date.format("%Y-%m-%d"), slot * 3);
            common::sample_at(&local, f64::from(temp))
        })
        .collect::<Vec<_>>();
    samples.sort_by_key(|sample| sample.time);
    samples
}

proptest! {
    #[test]
    fn day_count_matches_distinct_dates_capped_at_seven(
        offsets in prop::collection::vec((0u32..10, 0u32..8, -30i16..40), 1..60)
    ) {
        let samples = samples_from(&offsets);
        let mut dates = samples
            .iter()
            .map(|sample| sample.local_date(default_offset()))
            .collect::<Vec<_>>();
        dates.sort();
        dates.dedup();

        let days = aggregate(&samples);
        prop_assert_eq!(days.len(), dates.len().min(MAX_DAYS));
        let got = days.iter().map(|day| day.date).collect::<Vec<_>>();
        prop_assert_eq!(got, dates.into_iter().take(MAX_DAYS).collect::<Vec<_>>());
    }

    #[test]
    fn extremes_bound_each_day(
        offsets in prop::collection::vec((0u32..5, 0u32..8, -30i16..40), 1..40)
    ) {
        let samples = samples_from(&offsets);
        for day in aggregate(&samples) {
            prop_assert!(day.temp_min_c <= day.temp_max_c);
            prop_assert!(day.day_max_c <= day.temp_max_c);
            prop_assert!(day.night_min_c >= day.temp_min_c);
            prop_assert!(day.precipitation_percent <= 100);
        }
    }
}
