//! Scenario tests that drive the library end to end, plus command-line parsing.

mod resample_tests;
mod screen_tests;

use forecast_graph_lib::RawSample;

/// A UTC midnight used as the base day for every scenario.
pub const DAY: i64 = 19_700 * 86_400;

/// UTC-4, e.g. US Eastern daylight time.
pub const OFFSET: i64 = -4 * 3600;

/// UTC epoch of local `hour:00` on the scenario day.
pub fn local_hour(hour: i64) -> i64 {
    DAY + hour * 3600 - OFFSET
}

pub fn sample(local: i64, temp: Option<f32>, wind: Option<f32>, pop: Option<f32>) -> RawSample {
    RawSample {
        utc_epoch_seconds: local_hour(local),
        temperature: temp,
        wind_speed: wind,
        precipitation_probability: pop,
    }
}
