//! # Resampling Scenarios
//!
//! Exercises the resampler through its public entry point with a location at
//! UTC-4, so every test also covers the shifted-timeline day boundary.

use super::{local_hour, sample, OFFSET};
use forecast_graph_lib::resampler::{resample, smooth};
use forecast_graph_lib::{Metric, RawSample, ResampleStatus, GRAPH_HOURS};

/// Reference instant: local noon of the scenario day.
fn noon() -> i64 {
    local_hour(12)
}

/// A single sample is back- and forward-filled across the whole day.
#[test]
fn single_sample_fills_every_hour() {
    let samples = [sample(12, Some(70.0), Some(5.0), Some(0.1))];
    let forecast = resample(&samples, OFFSET, noon(), false);

    assert_eq!(forecast.status, ResampleStatus::Ok);
    for i in 0..GRAPH_HOURS {
        assert_eq!(forecast.temperature.get(i), Some(70.0), "temperature at index {i}");
        assert_eq!(forecast.wind.get(i), Some(5.0), "wind at index {i}");
        assert_eq!(forecast.precipitation.get(i), Some(0.1), "precipitation at index {i}");
    }
}

/// Smoothing a constant series leaves it (almost) unchanged.
#[test]
fn single_sample_with_smoothing_stays_flat() {
    let samples = [sample(12, Some(70.0), Some(5.0), Some(0.1))];
    let forecast = resample(&samples, OFFSET, noon(), true);

    for i in 0..GRAPH_HOURS {
        assert_eq!(forecast.temperature.get(i), Some(70.0));
        let pop = forecast.precipitation.get(i).unwrap();
        assert!((pop - 0.1).abs() < 1e-6, "precipitation drifted to {pop}");
    }
}

/// Hour 15 lies halfway between samples at 12 and 18.
#[test]
fn bracketed_hour_is_linear_blend() {
    let samples = [
        sample(12, Some(60.0), None, None),
        sample(18, Some(80.0), None, None),
    ];
    let forecast = resample(&samples, OFFSET, noon(), false);

    assert_eq!(forecast.temperature.get(6), Some(70.0));
    // Clamped at both ends of the sample range
    assert_eq!(forecast.temperature.get(0), Some(60.0));
    assert_eq!(forecast.temperature.get(12), Some(80.0));
}

/// No samples at all reports failure with every hour invalid.
#[test]
fn empty_input_fails() {
    let forecast = resample(&[], OFFSET, noon(), true);

    assert_eq!(forecast.status, ResampleStatus::NoInput);
    assert!(!forecast.any_valid());
    for metric in Metric::ALL {
        assert!(forecast.series(metric).valid.iter().all(|v| !v));
    }
}

/// The local day is picked from the reference instant, not from UTC.
///
/// 02:00 UTC on the next day is still 22:00 local on the scenario day.
#[test]
fn reference_late_evening_keeps_local_day() {
    let samples = [
        sample(9, Some(50.0), None, None),
        sample(21, Some(62.0), None, None),
    ];
    let late = local_hour(22);
    let forecast = resample(&samples, OFFSET, late, false);

    assert_eq!(forecast.temperature.get(0), Some(50.0));
    assert_eq!(forecast.temperature.get(12), Some(62.0));
    assert_eq!(forecast.temperature.get(6), Some(56.0));
}

/// Same inputs, bit-identical outputs.
#[test]
fn resample_is_idempotent() {
    let samples = [
        sample(6, Some(55.5), Some(3.0), Some(0.0)),
        sample(9, Some(58.25), Some(4.5), Some(0.2)),
        sample(12, Some(63.0), None, Some(0.35)),
        sample(15, Some(66.75), Some(9.0), None),
        sample(18, None, Some(7.5), Some(0.6)),
    ];
    let a = resample(&samples, OFFSET, noon(), true);
    let b = resample(&samples, OFFSET, noon(), true);

    assert_eq!(a.status, b.status);
    for metric in Metric::ALL {
        let (sa, sb) = (a.series(metric), b.series(metric));
        assert_eq!(sa.valid, sb.valid);
        for i in 0..GRAPH_HOURS {
            assert_eq!(sa.values[i].to_bits(), sb.values[i].to_bits(), "{metric:?} index {i}");
        }
    }
}

/// Any non-empty input with a value gives every hour a value.
#[test]
fn non_empty_input_covers_all_hours() {
    let sets: [&[RawSample]; 3] = [
        &[sample(-30, Some(40.0), None, None)],
        &[sample(40, None, Some(2.0), None)],
        &[
            sample(10, None, None, Some(0.5)),
            sample(13, None, None, Some(0.7)),
        ],
    ];
    for samples in sets {
        let forecast = resample(samples, OFFSET, noon(), false);
        assert!(
            forecast.temperature.valid.iter().all(|&v| v),
            "every hour should resolve for {samples:?}"
        );
    }
}

/// Interpolated values stay within their two bracket values.
#[test]
fn interpolation_stays_within_bracket() {
    let samples = [
        sample(8, Some(71.0), Some(12.0), Some(0.9)),
        sample(11, Some(64.0), Some(3.0), Some(0.1)),
        sample(14, Some(64.0), Some(8.0), Some(0.4)),
        sample(17, Some(52.0), Some(1.0), Some(0.0)),
        sample(20, Some(58.0), Some(6.0), Some(0.3)),
        sample(23, Some(49.0), Some(2.0), Some(1.0)),
    ];
    let forecast = resample(&samples, OFFSET, noon(), false);

    for i in 0..GRAPH_HOURS {
        let hour = 9 + i as i64;
        let before = samples
            .iter()
            .rev()
            .find(|s| s.utc_epoch_seconds <= local_hour(hour))
            .unwrap();
        let after = samples
            .iter()
            .find(|s| s.utc_epoch_seconds >= local_hour(hour))
            .unwrap();
        for metric in Metric::ALL {
            let (v0, v1) = (before.metric(metric).unwrap(), after.metric(metric).unwrap());
            let value = forecast.series(metric).get(i).unwrap();
            assert!(
                value >= v0.min(v1) - 1e-5 && value <= v0.max(v1) + 1e-5,
                "{metric:?} at {hour}:00 = {value}, bracket {v0}..{v1}"
            );
        }
    }
}

/// Duplicate timestamps take the single sample's value, never NaN.
#[test]
fn identical_bracket_timestamps_are_safe() {
    let samples = [
        sample(15, Some(61.0), Some(4.0), None),
        sample(15, Some(61.0), Some(4.0), None),
    ];
    let forecast = resample(&samples, OFFSET, noon(), false);

    assert_eq!(forecast.temperature.get(6), Some(61.0));
    assert!(forecast.temperature.values.iter().all(|v| !v.is_nan()));
    assert!(forecast.wind.values.iter().all(|v| !v.is_nan()));
}

/// Interior hours with both neighbours valid follow the (1, 2, 1) / 4 weights.
#[test]
fn smoothing_matches_weight_law() {
    let samples = [
        sample(9, Some(50.0), None, None),
        sample(12, Some(68.0), None, None),
        sample(15, Some(55.0), None, None),
        sample(18, Some(75.0), None, None),
        sample(21, Some(60.0), None, None),
    ];
    let raw = resample(&samples, OFFSET, noon(), false);
    let smoothed = resample(&samples, OFFSET, noon(), true);

    let o = raw.temperature.values;
    for i in 1..GRAPH_HOURS - 1 {
        let expected = (2.0 * o[i] + o[i - 1] + o[i + 1]) / 4.0;
        assert_eq!(smoothed.temperature.values[i], expected, "index {i}");
    }
    // Endpoints only have one neighbour
    assert_eq!(smoothed.temperature.values[0], (2.0 * o[0] + o[1]) / 3.0);
    assert_eq!(smoothed.temperature.values[12], (2.0 * o[12] + o[11]) / 3.0);
}

/// Smoothing leaves invalid hours alone and ignores them as neighbours.
#[test]
fn smoothing_skips_invalid_hours() {
    let mut values = [10.0f32; GRAPH_HOURS];
    let mut valid = [true; GRAPH_HOURS];
    values[5] = f32::NAN;
    valid[5] = false;
    values[4] = 40.0;

    let out = smooth(&values, &valid);
    assert!(out[5].is_nan());
    assert_eq!(out[4], (2.0 * 40.0 + 10.0) / 3.0);
}

/// A valid hour may still carry NaN for a metric; an invalid hour is NaN throughout.
#[test]
fn validity_is_joint_across_metrics() {
    let samples = [
        sample(12, None, Some(6.0), None),
        sample(15, None, None, None),
        sample(18, None, None, None),
    ];
    let forecast = resample(&samples, OFFSET, noon(), false);

    // Up to 12:00 the wind sample resolves alone
    for i in 0..=3 {
        assert!(forecast.temperature.valid[i]);
        assert!(forecast.wind.valid[i]);
        assert!(forecast.temperature.values[i].is_nan());
        assert_eq!(forecast.wind.get(i), Some(6.0));
        assert_eq!(forecast.temperature.get(i), None);
    }
    // From 15:00 on both brackets are empty: exact hit at 15 and 18, clamp at 21
    for i in [6, 9, 12] {
        assert!(!forecast.wind.valid[i], "index {i} should be invalid");
        for metric in Metric::ALL {
            assert!(forecast.series(metric).values[i].is_nan());
        }
    }
}

/// Samples exist but none carries any metric.
#[test]
fn nothing_resolvable_reports_failure() {
    let samples = [sample(12, None, None, None), sample(15, None, None, Some(f32::NAN))];
    let forecast = resample(&samples, OFFSET, noon(), true);

    assert_eq!(forecast.status, ResampleStatus::NoResolvableData);
    assert!(!forecast.any_valid());
}
