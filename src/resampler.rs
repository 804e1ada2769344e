//! # Local-Hour Resampling
//!
//! Maps irregular forecast samples (one roughly every 3 hours, UTC stamped)
//! onto the fixed 09:00–21:00 grid of the location's *local* calendar day.
//!
//! ## Shifted Timeline
//! Local wall-clock fields are derived without a timezone database: the
//! reference instant is shifted by the location's UTC offset and the result
//! is read as if it were UTC. Every sample gets the identical shift, so
//! samples and grid targets live in one timeline:
//! ```text
//! shifted        = reference_utc + offset
//! local_midnight = shifted - seconds_since_midnight(shifted)
//! target(H)      = local_midnight + H * 3600
//! sample_ts      = sample_utc + offset
//! ```
//!
//! ## Interpolation Algorithm
//! For each target hour one forward scan finds `idx0` (last sample at or
//! before the target) and `idx1` (first sample at or after it). A missing
//! side is clamped to the first/last sample, so a non-empty input always
//! yields a bracket. Values are then blended linearly:
//! ```text
//! value = v0 + (v1 - v0) * alpha,   alpha = (target - t0) / (t1 - t0) in [0, 1]
//! ```
//! A metric missing on one side takes the other side as-is; missing on both
//! sides leaves the metric NaN for that hour.

use crate::{
    HourlyForecast, LocalHourSeries, Metric, RawSample, ResampleStatus, FIRST_HOUR, GRAPH_HOURS,
};
use chrono::DateTime;
use log::{debug, info, log_enabled, Level};

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_DAY: i64 = 86_400;

/// Epoch of local midnight for the day containing `reference_utc_epoch`,
/// expressed in the shifted timeline.
pub fn local_midnight(reference_utc_epoch: i64, utc_offset_seconds: i64) -> i64 {
    let shifted = reference_utc_epoch.saturating_add(utc_offset_seconds);
    // Equivalent to subtracting h*3600 + m*60 + s of the shifted value read as UTC.
    shifted.saturating_sub(shifted.rem_euclid(SECONDS_PER_DAY))
}

/// Shifted-timeline timestamps of the 13 grid hours.
pub fn target_timestamps(local_midnight: i64) -> [i64; GRAPH_HOURS] {
    let mut targets = [0i64; GRAPH_HOURS];
    for (i, target) in targets.iter_mut().enumerate() {
        *target = local_midnight
            .saturating_add(i64::from(LocalHourSeries::hour_label(i)) * SECONDS_PER_HOUR);
    }
    targets
}

/// Find the `(idx0, idx1)` bracket around `target` in a single forward scan.
///
/// Returns `None` only for an empty slice. Unsorted input still produces a
/// bracket: later matches simply overwrite `idx0`.
pub fn find_bracket(local_timestamps: &[i64], target: i64) -> Option<(usize, usize)> {
    let last = local_timestamps.len().checked_sub(1)?;

    let mut idx0 = None;
    let mut idx1 = None;
    for (s, &ts) in local_timestamps.iter().enumerate() {
        if ts <= target {
            idx0 = Some(s);
        }
        if ts >= target {
            idx1 = Some(s);
            break;
        }
    }

    // Backfill before the first sample, forward-fill after the last one
    Some((idx0.unwrap_or(0), idx1.unwrap_or(last)))
}

fn lerp(a: f32, b: f32, alpha: f64) -> f32 {
    a + (b - a) * alpha as f32
}

/// Blend one metric across a bracket, falling back to whichever side exists.
fn blend(v0: Option<f32>, v1: Option<f32>, alpha: f64) -> Option<f32> {
    match (v0, v1) {
        (Some(a), Some(b)) => Some(lerp(a, b, alpha)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Resolve all three metrics at one target timestamp.
fn resolve_hour(samples: &[RawSample], local_ts: &[i64], target: i64) -> Option<[Option<f32>; 3]> {
    let (idx0, idx1) = find_bracket(local_ts, target)?;
    let (t0, t1) = (local_ts[idx0], local_ts[idx1]);
    let (s0, s1) = (&samples[idx0], &samples[idx1]);

    let mut resolved = [None; 3];
    for (slot, metric) in resolved.iter_mut().zip(Metric::ALL) {
        *slot = if idx0 == idx1 || t0 == t1 {
            s0.metric(metric)
        } else {
            // Widened so far-apart feed timestamps cannot overflow
            let span = (i128::from(t1) - i128::from(t0)) as f64;
            let alpha = ((i128::from(target) - i128::from(t0)) as f64 / span).clamp(0.0, 1.0);
            blend(s0.metric(metric), s1.metric(metric), alpha)
        };
    }
    Some(resolved)
}

/// Weighted 3-point smoothing: centre weight 2, each usable neighbour weight 1.
///
/// Single pass over the original values. An element is only touched when it
/// is valid and non-NaN, and only such neighbours contribute.
pub fn smooth(values: &[f32; GRAPH_HOURS], valid: &[bool; GRAPH_HOURS]) -> [f32; GRAPH_HOURS] {
    let usable = |i: usize| valid[i] && !values[i].is_nan();

    let mut smoothed = *values;
    for i in 0..GRAPH_HOURS {
        if !usable(i) {
            continue;
        }
        let mut sum = values[i] * 2.0;
        let mut count = 2.0f32;
        if i > 0 && usable(i - 1) {
            sum += values[i - 1];
            count += 1.0;
        }
        if i + 1 < GRAPH_HOURS && usable(i + 1) {
            sum += values[i + 1];
            count += 1.0;
        }
        smoothed[i] = sum / count;
    }
    smoothed
}

/// Resample raw forecast samples onto the local-hour grid.
///
/// `reference_utc_epoch` picks the local day (normally "now"). The result is
/// never an error: an empty input or a day where nothing resolves comes back
/// as an all-invalid [`HourlyForecast`] whose status says why.
///
/// # Example
/// ```
/// use forecast_graph_lib::{resampler::resample, RawSample};
///
/// // 12:00 UTC, location at UTC+0
/// let noon = 1_700_000_000 - 1_700_000_000 % 86_400 + 12 * 3600;
/// let samples = [RawSample {
///     utc_epoch_seconds: noon,
///     temperature: Some(70.0),
///     wind_speed: Some(5.0),
///     precipitation_probability: Some(0.1),
/// }];
///
/// let forecast = resample(&samples, 0, noon, true);
/// assert!(forecast.any_valid());
/// assert_eq!(forecast.temperature.get(0), Some(70.0));
/// ```
pub fn resample(
    samples: &[RawSample],
    utc_offset_seconds: i64,
    reference_utc_epoch: i64,
    smooth_series: bool,
) -> HourlyForecast {
    if samples.is_empty() {
        info!("Resample: no forecast samples available");
        return HourlyForecast::no_data(ResampleStatus::NoInput);
    }

    let midnight = local_midnight(reference_utc_epoch, utc_offset_seconds);
    let targets = target_timestamps(midnight);
    let local_ts: Vec<i64> = samples
        .iter()
        .map(|s| s.utc_epoch_seconds.saturating_add(utc_offset_seconds))
        .collect();

    if log_enabled!(Level::Debug) {
        dump_mapping(samples, &local_ts, &targets);
    }

    let mut forecast = HourlyForecast::no_data(ResampleStatus::NoResolvableData);
    let mut valid = [false; GRAPH_HOURS];

    for (i, &target) in targets.iter().enumerate() {
        let Some(resolved) = resolve_hour(samples, &local_ts, target) else {
            continue;
        };
        valid[i] = resolved.iter().any(Option::is_some);
        if !valid[i] {
            continue;
        }
        for (metric, value) in Metric::ALL.into_iter().zip(resolved) {
            forecast.series_mut(metric).values[i] = value.unwrap_or(f32::NAN);
        }
    }

    if !valid.iter().any(|&v| v) {
        info!("Resample: none of the {GRAPH_HOURS} local hours resolved a value");
        return forecast;
    }

    for metric in Metric::ALL {
        let series = forecast.series_mut(metric);
        series.valid = valid;
        if smooth_series {
            series.values = smooth(&series.values, &valid);
        }
    }
    forecast.status = ResampleStatus::Ok;

    info!(
        "Resample: {} of {GRAPH_HOURS} local hours valid (smoothing {})",
        valid.iter().filter(|&&v| v).count(),
        if smooth_series { "on" } else { "off" }
    );
    forecast
}

/// Render a shifted-timeline timestamp as local wall-clock text.
fn shifted_wall_clock(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn dump_mapping(samples: &[RawSample], local_ts: &[i64], targets: &[i64; GRAPH_HOURS]) {
    debug!("Resample: raw samples (UTC -> local):");
    for (s, (sample, &ts)) in samples.iter().zip(local_ts).enumerate() {
        let show = |v: Option<f32>| v.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"));
        debug!(
            " s={s:02} UTC={} local={}  T={} W={} POP={}",
            shifted_wall_clock(sample.utc_epoch_seconds),
            shifted_wall_clock(ts),
            show(sample.metric(Metric::Temperature)),
            show(sample.metric(Metric::Wind)),
            show(sample.metric(Metric::Precipitation)),
        );
    }
    for (i, &target) in targets.iter().enumerate() {
        if let Some((idx0, idx1)) = find_bracket(local_ts, target) {
            debug!(
                " H={:02} -> idx0={idx0} ({})  idx1={idx1} ({})",
                FIRST_HOUR + i as u32,
                shifted_wall_clock(local_ts[idx0]),
                shifted_wall_clock(local_ts[idx1]),
            );
        }
    }
}
