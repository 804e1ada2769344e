//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! forecast-config.toml file. It provides a centralized way to configure the
//! forecast location, caching, screen layout and logging.

use log::{info, warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "forecast-config.toml";

/// Application configuration loaded from forecast-config.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Forecast location
    pub location: LocationConfig,
    /// Fetching, caching and resampling
    pub forecast: ForecastConfig,
    /// Screen layout
    pub display: DisplayConfig,
    /// Log output
    pub logging: LoggingConfig,
}

/// Forecast location configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct LocationConfig {
    /// OpenWeather city query (e.g., "Boston,US")
    pub city: String,
    /// Environment variable that holds the API key
    pub api_key_env: String,
    /// OpenWeather unit system; graph titles assume "imperial"
    pub units: String,
}

/// Fetch and resample configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct ForecastConfig {
    /// Where the raw forecast payload is cached
    pub cache_path: String,
    /// Cache TTL in minutes
    pub cache_ttl_minutes: u64,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Apply 3-point smoothing after resampling
    pub smooth: bool,
}

/// Display and layout configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Screen width in pixels
    pub width: i32,
    /// Screen height in pixels
    pub height: i32,
    /// Graph rectangle, absolute pixels
    pub graph_x: i32,
    pub graph_y: i32,
    pub graph_width: i32,
    pub graph_height: i32,
    /// Width of the current-conditions panel on the left
    pub panel_width: i32,
    /// Height of the clock band along the bottom
    pub clock_band_height: i32,
    /// PPM file the rendered screen is written to
    pub output_path: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// One of off, error, warn, info, debug, trace
    pub level: String,
}

impl LoggingConfig {
    /// Parsed level, `Info` for anything unrecognized.
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.level.trim()).unwrap_or(LevelFilter::Info)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            location: LocationConfig {
                city: "Boston,US".to_string(),
                api_key_env: "OPENWEATHER_API_KEY".to_string(),
                units: "imperial".to_string(),
            },
            forecast: ForecastConfig {
                cache_path: "/tmp/forecast_cache.json".to_string(),
                cache_ttl_minutes: 10,
                request_timeout_secs: 10,
                smooth: true,
            },
            display: DisplayConfig {
                width: 320,  // 2" ST7789 panel, landscape
                height: 240,
                graph_x: 104,
                graph_y: 4,
                graph_width: 212,
                graph_height: 200,
                panel_width: 96,
                clock_band_height: 32,
                output_path: "forecast.ppm".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("Loaded configuration for {}", config.location.city);
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format: {}", e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
