use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{DisplayRecord, ForecastPoint, RegionSeries};

/// Hours added to the earliest point when every point of a series is already
/// in the past: the series is treated as rolled over to its next interval.
const NEXT_INTERVAL_HOURS: i64 = 3;

/// Picks `sample_size` regions at random and, for each, the forecast point
/// most relevant to `reference_time`.
///
/// Regions without any forecast points are never candidates. When fewer
/// regions than `sample_size` are available, all of them are returned;
/// an empty input yields an empty result.
pub fn select_display_records(
    all_series: &[RegionSeries],
    reference_time: NaiveDateTime,
    sample_size: usize,
) -> Vec<DisplayRecord> {
    select_display_records_with(&mut rand::thread_rng(), all_series, reference_time, sample_size)
}

/// Same as [`select_display_records`] but with a caller-supplied RNG, which
/// makes the sampling reproducible in tests.
pub fn select_display_records_with<R: Rng + ?Sized>(
    rng: &mut R,
    all_series: &[RegionSeries],
    reference_time: NaiveDateTime,
    sample_size: usize,
) -> Vec<DisplayRecord> {
    let candidates: Vec<&RegionSeries> = all_series
        .iter()
        .filter(|series| !series.points.is_empty())
        .collect();

    candidates
        .choose_multiple(rng, sample_size)
        .filter_map(|series| {
            find_next_point(&series.points, reference_time)
                .map(|point| DisplayRecord::from_point(series.region.clone(), point))
        })
        .collect()
}

/// Returns the first point strictly after `reference_time` in timestamp
/// order.
///
/// When the whole series lies in the past, the earliest point is reused with
/// its timestamp pushed forward by three hours; every other field keeps its
/// stale value. Points sharing a timestamp keep their provider order (the
/// sort is stable). An empty series has no answer.
pub fn find_next_point(
    points: &[ForecastPoint],
    reference_time: NaiveDateTime,
) -> Option<ForecastPoint> {
    let mut sorted: Vec<&ForecastPoint> = points.iter().collect();
    sorted.sort_by_key(|point| point.local_time);

    let earliest = *sorted.first()?;

    match sorted.iter().find(|point| point.local_time > reference_time) {
        Some(next) => Some((*next).clone()),
        None => {
            let mut rolled = earliest.clone();
            rolled.local_time = rolled.local_time + Duration::hours(NEXT_INTERVAL_HOURS);
            Some(rolled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").expect("valid test timestamp")
    }

    fn point(time: &str, temperature_c: f64, description: &str) -> ForecastPoint {
        ForecastPoint {
            local_time: ts(time),
            temperature_c,
            humidity_pct: 75.0,
            condition_code: 3,
            description: description.to_string(),
            icon_url: format!("https://img.example/{description}.svg"),
        }
    }

    fn series(region: &str, points: Vec<ForecastPoint>) -> RegionSeries {
        RegionSeries {
            region: region.to_string(),
            points,
        }
    }

    #[test]
    fn picks_first_strictly_future_point() {
        let points = vec![
            point("2024-01-01T10:00:00", 28.0, "Clear"),
            point("2024-01-01T13:00:00", 27.0, "Cloudy"),
            point("2024-01-01T16:00:00", 26.0, "Rain"),
        ];

        let chosen = find_next_point(&points, ts("2024-01-01T11:30:00")).unwrap();
        assert_eq!(chosen.local_time, ts("2024-01-01T13:00:00"));
        assert_eq!(chosen.description, "Cloudy");
    }

    #[test]
    fn sorts_unordered_input_before_scanning() {
        let points = vec![
            point("2024-01-01T16:00:00", 26.0, "Rain"),
            point("2024-01-01T10:00:00", 28.0, "Clear"),
            point("2024-01-01T13:00:00", 27.0, "Cloudy"),
        ];

        let chosen = find_next_point(&points, ts("2024-01-01T11:30:00")).unwrap();
        assert_eq!(chosen.local_time, ts("2024-01-01T13:00:00"));
    }

    #[test]
    fn point_at_reference_time_is_not_future() {
        let points = vec![
            point("2024-01-01T10:00:00", 28.0, "Clear"),
            point("2024-01-01T13:00:00", 27.0, "Cloudy"),
        ];

        // 13:00 is not strictly later than 13:00, so the series is exhausted
        // and the fallback applies.
        let chosen = find_next_point(&points, ts("2024-01-01T13:00:00")).unwrap();
        assert_eq!(chosen.local_time, ts("2024-01-01T13:00:00"));
        assert_eq!(chosen.description, "Clear");
    }

    #[test]
    fn exhausted_series_rolls_earliest_point_forward() {
        let points = vec![
            point("2024-01-01T10:00:00", 28.0, "Clear"),
            point("2024-01-01T13:00:00", 27.0, "Cloudy"),
        ];

        let chosen = find_next_point(&points, ts("2024-01-01T14:00:00")).unwrap();
        assert_eq!(chosen.local_time, ts("2024-01-01T13:00:00"));
        assert_eq!(chosen.temperature_c, 28.0);
        assert_eq!(chosen.description, "Clear");
        assert_eq!(chosen.humidity_pct, 75.0);
    }

    #[test]
    fn empty_series_has_no_next_point() {
        assert_eq!(find_next_point(&[], ts("2024-01-01T12:00:00")), None);
    }

    #[test]
    fn returns_sample_size_distinct_regions() {
        let all: Vec<RegionSeries> = (0..10)
            .map(|i| {
                series(
                    &format!("region-{i}"),
                    vec![point("2024-01-01T13:00:00", 27.0, "Cloudy")],
                )
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(7);
        let records =
            select_display_records_with(&mut rng, &all, ts("2024-01-01T11:30:00"), 3);

        assert_eq!(records.len(), 3);
        let mut regions: Vec<&str> = records.iter().map(|r| r.region.as_str()).collect();
        regions.sort_unstable();
        regions.dedup();
        assert_eq!(regions.len(), 3);
    }

    #[test]
    fn fewer_regions_than_sample_size_returns_all() {
        let all = vec![
            series("a", vec![point("2024-01-01T13:00:00", 27.0, "Cloudy")]),
            series("b", vec![point("2024-01-01T14:00:00", 25.0, "Rain")]),
        ];

        let mut rng = StdRng::seed_from_u64(7);
        let records =
            select_display_records_with(&mut rng, &all, ts("2024-01-01T11:30:00"), 3);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = select_display_records_with(&mut rng, &[], ts("2024-01-01T11:30:00"), 3);
        assert!(records.is_empty());
    }

    #[test]
    fn regions_without_points_are_skipped() {
        let all = vec![
            series("empty", vec![]),
            series("full", vec![point("2024-01-01T13:00:00", 27.0, "Cloudy")]),
        ];

        let mut rng = StdRng::seed_from_u64(7);
        let records =
            select_display_records_with(&mut rng, &all, ts("2024-01-01T11:30:00"), 2);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].region, "full");
    }

    #[test]
    fn selects_next_forecast_for_single_region() {
        let all = vec![series(
            "A",
            vec![
                point("2024-01-01T10:00:00", 28.0, "Clear"),
                point("2024-01-01T13:00:00", 27.0, "Cloudy"),
            ],
        )];

        let mut rng = StdRng::seed_from_u64(7);
        let records =
            select_display_records_with(&mut rng, &all, ts("2024-01-01T11:30:00"), 3);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].region, "A");
        assert_eq!(records[0].temperature_c, 27.0);
        assert_eq!(records[0].description, "Cloudy");
        assert_eq!(records[0].local_time, ts("2024-01-01T13:00:00"));
    }
}
