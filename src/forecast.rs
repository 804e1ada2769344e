//! # Forecast Fetching and Caching
//!
//! This module obtains the 3-hour forecast from OpenWeather and exposes it
//! to the rest of the crate as plain [`RawSample`]s plus the location's UTC
//! offset. It includes a TTL file cache so that screen refreshes do not turn
//! into network requests.
//!
//! ## Data Source
//! - **URL**: `https://api.openweathermap.org/data/2.5/forecast`
//! - **Query**: city name (`q=`), API key (`appid=`), `units=imperial`
//! - **Format**: JSON, one `list[]` entry roughly every 3 hours for 5 days
//! - **Offset**: `city.timezone`, seconds east of UTC
//!
//! ## Caching Strategy
//! - **Location**: configurable, `/tmp/forecast_cache.json` by default
//! - **Format**: the raw payload as received, so a cached copy parses the
//!   same way as a fresh one
//! - **TTL**: configurable, checked against the file modification time
//!
//! ## Error Handling
//! All failures surface as [`ForecastError`]. None of them is fatal: the
//! caller keeps showing the previously published series.

use crate::config::Config;
use crate::RawSample;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime};
use std::{env, fs, io};
use thiserror::Error;

const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Upper bound on forecast entries taken from one payload.
pub const MAX_SAMPLES: usize = 256;

/// Longest one-line report before it gets truncated.
const REPORT_MAX_LEN: usize = 120;

/// Errors that can occur while obtaining forecast data.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// HTTP request failed (network, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Body was not a forecast payload
    #[error("forecast JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Cache file operations failed
    #[error("cache IO: {0}")]
    Cache(#[from] io::Error),

    /// The configured environment variable holds no API key
    #[error("API key variable {0} is not set")]
    MissingApiKey(String),
}

/// Source-data provider.
pub trait ForecastSource {
    /// Samples in feed order (normally non-decreasing in time).
    fn samples(&self) -> Vec<RawSample>;
    /// Location offset from UTC in seconds.
    fn utc_offset_seconds(&self) -> i64;
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Coord {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct City {
    pub name: Option<String>,
    pub country: Option<String>,
    /// Seconds east of UTC
    pub timezone: Option<i64>,
    pub coord: Option<Coord>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MainBlock {
    pub temp: Option<f32>,
    pub humidity: Option<i32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WindBlock {
    pub speed: Option<f32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Condition {
    pub description: Option<String>,
}

/// One `list[]` entry of the forecast.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// UTC epoch seconds
    #[serde(default)]
    pub dt: i64,
    pub main: Option<MainBlock>,
    pub wind: Option<WindBlock>,
    /// Probability of precipitation, 0..1
    pub pop: Option<f32>,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

impl ForecastEntry {
    pub fn temperature(&self) -> Option<f32> {
        self.main.as_ref().and_then(|m| m.temp)
    }

    pub fn humidity(&self) -> Option<i32> {
        self.main.as_ref().and_then(|m| m.humidity).filter(|h| *h >= 0)
    }

    pub fn wind_speed(&self) -> Option<f32> {
        self.wind.as_ref().and_then(|w| w.speed)
    }

    pub fn description(&self) -> &str {
        self.weather
            .first()
            .and_then(|c| c.description.as_deref())
            .unwrap_or("")
    }

    fn to_sample(&self) -> RawSample {
        RawSample {
            utc_epoch_seconds: self.dt,
            temperature: self.temperature(),
            wind_speed: self.wind_speed(),
            precipitation_probability: self.pop,
        }
    }
}

/// The OpenWeather 3-hour forecast document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub city: Option<City>,
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

impl ForecastPayload {
    pub fn from_json(data: &[u8]) -> Result<Self, ForecastError> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn city_name(&self) -> &str {
        self.city
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .unwrap_or("")
    }

    /// First entry, used as the "now-ish" conditions.
    pub fn first_entry(&self) -> Option<&ForecastEntry> {
        self.list.first()
    }

    /// One-line ticker summary built from the first entry.
    ///
    /// `"<city> <T>°F <desc> Hum <H>% Wind <W>mph"`, dropping the humidity
    /// clause when unknown and everything numeric when the temperature is.
    pub fn report(&self) -> String {
        let city = self.city_name();
        let Some(first) = self.first_entry() else {
            return city.to_string();
        };
        let desc = first.description();

        let report = match first.temperature() {
            None => format!("{city} {desc}"),
            Some(temp) => {
                let t = temp.round() as i32;
                let w = first.wind_speed().map_or(0, |w| w.round() as i32);
                match first.humidity() {
                    Some(h) => format!("{city} {t}°F {desc} Hum {h}% Wind {w}mph"),
                    None => format!("{city} {t}°F {desc} Wind {w}mph"),
                }
            }
        };
        shorten(&report, REPORT_MAX_LEN)
    }
}

impl ForecastSource for ForecastPayload {
    fn samples(&self) -> Vec<RawSample> {
        self.list
            .iter()
            .take(MAX_SAMPLES)
            .map(ForecastEntry::to_sample)
            .collect()
    }

    fn utc_offset_seconds(&self) -> i64 {
        self.city.as_ref().and_then(|c| c.timezone).unwrap_or(0)
    }
}

/// In-memory source, mainly for tests and replaying captured data.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    pub samples: Vec<RawSample>,
    pub utc_offset_seconds: i64,
}

impl ForecastSource for StaticSource {
    fn samples(&self) -> Vec<RawSample> {
        self.samples.clone()
    }

    fn utc_offset_seconds(&self) -> i64 {
        self.utc_offset_seconds
    }
}

/// Truncate to `max_len` characters, ending in `...` when cut.
fn shorten(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Fetch the forecast, preferring a fresh cache file over the network.
///
/// # Example
/// ```no_run
/// use forecast_graph_lib::{config::Config, forecast};
///
/// # async fn run() {
/// let config = Config::default();
/// match forecast::fetch(&config).await {
///     Ok(payload) => println!("{}", payload.report()),
///     Err(err) => eprintln!("forecast unavailable: {err}"),
/// }
/// # }
/// ```
pub async fn fetch(config: &Config) -> Result<ForecastPayload, ForecastError> {
    let cache_path = Path::new(&config.forecast.cache_path);
    let ttl = Duration::from_secs(config.forecast.cache_ttl_minutes * 60);

    match load_cache(cache_path, ttl) {
        Ok(payload) => {
            info!("Forecast: using cached payload from {}", cache_path.display());
            return Ok(payload);
        }
        Err(err) => info!("Forecast: cache unusable ({err}), fetching"),
    }

    let raw = request(config).await?;
    let payload = ForecastPayload::from_json(&raw)?;

    if let Err(err) = save_cache(cache_path, &raw) {
        warn!("Forecast: could not write cache: {err}");
    }
    Ok(payload)
}

/// Build the forecast request URL for the configured location.
pub fn request_url(config: &Config, api_key: &str) -> String {
    format!(
        "{FORECAST_URL}?q={}&appid={}&units={}",
        config.location.city, api_key, config.location.units
    )
}

async fn request(config: &Config) -> Result<Vec<u8>, ForecastError> {
    let key_var = &config.location.api_key_env;
    let api_key = env::var(key_var)
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ForecastError::MissingApiKey(key_var.clone()))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.forecast.request_timeout_secs))
        .build()?;

    info!("Forecast: requesting {} for {}", FORECAST_URL, config.location.city);
    let response = client.get(request_url(config, &api_key)).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ForecastError::Status(status.as_u16()));
    }
    let body = response.bytes().await?;
    info!("Forecast: received {} bytes", body.len());
    Ok(body.to_vec())
}

/// Load the cached payload if the file is no older than `ttl`.
pub fn load_cache(path: &Path, ttl: Duration) -> Result<ForecastPayload, ForecastError> {
    let meta = fs::metadata(path)?;

    let age = SystemTime::now()
        .duration_since(meta.modified()?)
        .map_err(|_| io::Error::other("cache modified in the future"))?;
    if age > ttl {
        return Err(io::Error::other("stale").into());
    }

    ForecastPayload::from_json(&fs::read(path)?)
}

/// Store the raw payload for later runs.
pub fn save_cache(path: &Path, raw: &[u8]) -> Result<(), io::Error> {
    fs::write(path, raw)
}
