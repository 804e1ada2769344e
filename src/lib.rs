//! # Forecast Graph Core Library
//!
//! This library turns an irregular 3-hour weather forecast into a dense hourly
//! series for the *local* calendar day of a location and renders it as a
//! small line graph. It is designed for fixed-size panels (320x240 TFTs and
//! similar) where every recomputation is cheap and stateless.
//!
//! ## Design Philosophy
//!
//! ### Fixed Local-Hour Grid
//! - **13 slots**: local hours 09:00 through 21:00, index 0 = 09:00
//! - **Fixed-size arrays**: `[f32; 13]` per metric, no heap allocation per cycle
//! - **NaN sentinel**: a slot with no value holds `f32::NAN`, never a fake zero
//!
//! ### Joint Validity
//! An hour is valid when at least one of temperature, wind or precipitation
//! resolved to a value. The flag is shared by all three metrics, so a valid
//! hour may still hold NaN for one metric: always check both.
//!
//! ### Data Flow
//! 1. **Fetch**: OpenWeather 3-hour forecast → cache → [`RawSample`]s ([`forecast`])
//! 2. **Resample**: raw samples → [`HourlyForecast`] ([`resampler`])
//! 3. **Publish**: replace the shown series only on success ([`dashboard`])
//! 4. **Render**: series → draw plan → drawing primitives ([`renderer`], [`canvas`])
//!
//! ## Core Types
//! - [`RawSample`]: one forecast point as received from the source
//! - [`LocalHourSeries`]: one metric on the local-hour grid
//! - [`HourlyForecast`]: the three metric series plus the resample outcome

use serde::{Deserialize, Serialize};

// Module declarations
pub mod canvas;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod forecast;
pub mod framebuffer;
pub mod panel;
pub mod renderer;
pub mod resampler;

/// Number of local hours on the graph grid (09:00..=21:00).
pub const GRAPH_HOURS: usize = 13;

/// Local hour represented by grid index 0.
pub const FIRST_HOUR: u32 = 9;

/// A single forecast data point as delivered by the source feed.
///
/// Timestamps are always UTC epoch seconds; the location's offset is applied
/// later by the resampler. Any metric may be missing from a given entry.
///
/// # Example
/// ```
/// use forecast_graph_lib::RawSample;
///
/// let sample = RawSample {
///     utc_epoch_seconds: 1_700_000_000,
///     temperature: Some(68.5),
///     wind_speed: Some(4.0),
///     precipitation_probability: None,
/// };
/// assert!(sample.precipitation_probability.is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Source timestamp in UTC epoch seconds
    pub utc_epoch_seconds: i64,
    /// Temperature in the feed's native unit (°F for imperial)
    pub temperature: Option<f32>,
    /// Wind speed in the feed's native unit (mph for imperial)
    pub wind_speed: Option<f32>,
    /// Probability of precipitation, 0.0 to 1.0
    pub precipitation_probability: Option<f32>,
}

impl RawSample {
    /// Value of one metric, treating a NaN payload the same as a missing one.
    pub fn metric(&self, metric: Metric) -> Option<f32> {
        let value = match metric {
            Metric::Temperature => self.temperature,
            Metric::Wind => self.wind_speed,
            Metric::Precipitation => self.precipitation_probability,
        };
        value.filter(|v| !v.is_nan())
    }
}

/// The three plotted weather metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Wind,
    Precipitation,
}

impl Metric {
    /// All metrics in resampling and display order.
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Wind, Metric::Precipitation];

    /// Parse a command-line style selector (`temp`, `wind`, `pop`).
    pub fn from_selector(selector: &str) -> Option<Metric> {
        match selector.trim().to_ascii_lowercase().as_str() {
            "temp" | "temperature" | "0" => Some(Metric::Temperature),
            "wind" | "1" => Some(Metric::Wind),
            "pop" | "precip" | "precipitation" | "2" => Some(Metric::Precipitation),
            _ => None,
        }
    }
}

/// One metric resampled onto the local-hour grid.
///
/// `values[i]` belongs to local hour `FIRST_HOUR + i`. The `valid` flags are
/// shared with the other two metrics of the same [`HourlyForecast`]; when
/// `valid[i]` is false, `values[i]` is NaN.
#[derive(Clone, Copy, Debug)]
pub struct LocalHourSeries {
    /// Hourly values, `f32::NAN` for "no value"
    pub values: [f32; GRAPH_HOURS],
    /// Joint per-hour validity flag
    pub valid: [bool; GRAPH_HOURS],
}

impl LocalHourSeries {
    /// A series with every hour invalid.
    pub const fn empty() -> Self {
        Self {
            values: [f32::NAN; GRAPH_HOURS],
            valid: [false; GRAPH_HOURS],
        }
    }

    /// Local hour label for a grid index.
    pub const fn hour_label(index: usize) -> u32 {
        FIRST_HOUR + index as u32
    }

    /// Plottable value at `index`: the hour is valid *and* this metric is present.
    pub fn get(&self, index: usize) -> Option<f32> {
        match (self.valid.get(index), self.values.get(index)) {
            (Some(true), Some(v)) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }
}

impl Default for LocalHourSeries {
    fn default() -> Self {
        Self::empty()
    }
}

/// Outcome of one resampling pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResampleStatus {
    /// At least one hour resolved a value
    Ok,
    /// The sample collection was empty
    NoInput,
    /// Samples existed but no hour resolved any metric
    NoResolvableData,
}

/// The resampler's complete output for one update cycle.
#[derive(Clone, Copy, Debug)]
pub struct HourlyForecast {
    pub temperature: LocalHourSeries,
    pub wind: LocalHourSeries,
    pub precipitation: LocalHourSeries,
    pub status: ResampleStatus,
}

impl HourlyForecast {
    /// All-invalid output carrying the reason it is empty.
    pub const fn no_data(status: ResampleStatus) -> Self {
        Self {
            temperature: LocalHourSeries::empty(),
            wind: LocalHourSeries::empty(),
            precipitation: LocalHourSeries::empty(),
            status,
        }
    }

    /// True when at least one hour holds a value in some metric.
    pub fn any_valid(&self) -> bool {
        self.status == ResampleStatus::Ok
    }

    /// Series for the given metric.
    pub fn series(&self, metric: Metric) -> &LocalHourSeries {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Wind => &self.wind,
            Metric::Precipitation => &self.precipitation,
        }
    }

    pub(crate) fn series_mut(&mut self, metric: Metric) -> &mut LocalHourSeries {
        match metric {
            Metric::Temperature => &mut self.temperature,
            Metric::Wind => &mut self.wind,
            Metric::Precipitation => &mut self.precipitation,
        }
    }
}
