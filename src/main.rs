//! # Forecast Graph Application Entry Point
//!
//! This binary fetches the forecast, resamples it onto the local 09:00-21:00
//! grid and renders one metric graph next to a current-conditions panel.
//! It supports both screen mode (RGB565 framebuffer written as a PPM image)
//! and development mode (ASCII output on stdout).
//!
//! ## Usage
//! ```text
//! forecast-graph [--stdout] [--config <path>] [--metric temp|wind|pop]
//! ```

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use forecast_graph_lib::canvas::{palette, Canvas, GraphicsCanvas};
use forecast_graph_lib::clock::{format_time_12h, Clock, FixedClock, SystemClock};
use forecast_graph_lib::config::{Config, CONFIG_FILE};
use forecast_graph_lib::dashboard::Dashboard;
use forecast_graph_lib::forecast::{self, ForecastPayload, ForecastSource};
use forecast_graph_lib::framebuffer::FrameBuffer;
use forecast_graph_lib::panel::{plan_clock_band, CurrentConditions};
use forecast_graph_lib::renderer::{ascii_chart, GraphArea};
use forecast_graph_lib::{HourlyForecast, Metric, ResampleStatus};
use log::{error, info, warn, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Screen pixels per character in the `--stdout` preview.
const PREVIEW_CELL_W: u32 = 4;
const PREVIEW_CELL_H: u32 = 8;

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct Args {
    stdout: bool,
    config_path: String,
    metric: Metric,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut parsed = Args {
            stdout: false,
            config_path: CONFIG_FILE.to_string(),
            metric: Metric::Temperature,
        };
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--stdout" => parsed.stdout = true,
                "--config" => {
                    parsed.config_path = args.next().context("--config needs a path")?;
                }
                "--metric" => {
                    let selector = args.next().context("--metric needs a value")?;
                    parsed.metric = Metric::from_selector(&selector)
                        .with_context(|| format!("unknown metric '{selector}'"))?;
                }
                other => anyhow::bail!("unknown argument '{other}'"),
            }
        }
        Ok(parsed)
    }
}

/// Route the `log` facade to stderr at the configured level.
fn init_logging(level: LevelFilter) -> anyhow::Result<()> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {t} - {m}{n}",
        )))
        .build();

    let config = log4rs::Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .context("building log configuration")?;

    log4rs::init_config(config).context("installing logger")?;
    Ok(())
}

/// Draw the whole screen: panel, graph and clock band.
fn render_screen(
    config: &Config,
    dashboard: &Dashboard,
    conditions: &CurrentConditions,
    metric: Metric,
    clock: &dyn Clock,
) -> FrameBuffer {
    let display = &config.display;
    let mut framebuffer =
        FrameBuffer::new(display.width.max(0) as u32, display.height.max(0) as u32);
    let mut canvas = GraphicsCanvas::new(&mut framebuffer);

    canvas.fill_rect(0, 0, display.width, display.height, palette::BACKGROUND);

    let panel_area = GraphArea::new(
        4,
        display.graph_y,
        display.panel_width - 4,
        display.graph_height,
    );
    conditions.plan(panel_area).replay(&mut canvas);

    dashboard.draw(metric, clock, &mut canvas);

    let time_text = format_time_12h(clock.try_local_time());
    plan_clock_band(
        display.width,
        display.height,
        display.clock_band_height,
        &time_text,
    )
    .replay(&mut canvas);

    drop(canvas);
    framebuffer
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let args = Args::parse(env::args().skip(1))?;
    let config = Config::load_from_path(&args.config_path);
    init_logging(config.logging.level_filter())?;

    info!(
        "Starting forecast graph for {} ({:?})",
        config.location.city, args.metric
    );

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;

    // A failed fetch is not fatal: the screen shows the no-data placeholder
    let payload: Option<ForecastPayload> = rt.block_on(async {
        match forecast::fetch(&config).await {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!("Forecast fetch failed: {err}");
                None
            }
        }
    });

    let mut dashboard = Dashboard::new(config.forecast.smooth);
    dashboard.set_graph_area(
        config.display.graph_x,
        config.display.graph_y,
        config.display.graph_width,
        config.display.graph_height,
    );

    let clock: Box<dyn Clock> = match &payload {
        Some(payload) => {
            let status = dashboard.refresh(payload, SystemClock::now_epoch());
            info!("Resample finished with {status:?}");
            Box::new(SystemClock::with_offset(payload.utc_offset_seconds()))
        }
        None => Box::new(FixedClock(None)),
    };

    // Development mode: ASCII output for testing
    if args.stdout {
        if let Some(payload) = &payload {
            println!("{}", payload.report());
        }
        let empty = HourlyForecast::no_data(ResampleStatus::NoInput);
        let published = dashboard.published().unwrap_or(&empty);
        for metric in Metric::ALL {
            println!("{}", ascii_chart(metric, published.series(metric)));
        }
    }

    let conditions = payload
        .as_ref()
        .map(CurrentConditions::from_payload)
        .unwrap_or_default();
    let framebuffer = render_screen(&config, &dashboard, &conditions, args.metric, clock.as_ref());

    if args.stdout {
        print!("{}", framebuffer.to_ascii(PREVIEW_CELL_W, PREVIEW_CELL_H));
        return Ok(());
    }

    let output_path = &config.display.output_path;
    let file = File::create(output_path)
        .with_context(|| format!("creating output image {output_path}"))?;
    let mut writer = BufWriter::new(file);
    if let Err(err) = framebuffer.write_ppm(&mut writer).and_then(|()| writer.flush()) {
        error!("Writing {output_path} failed: {err}");
        return Err(err).context("writing output image");
    }
    info!(
        "Wrote {}x{} screen to {output_path} ({} lit pixels)",
        config.display.width,
        config.display.height,
        framebuffer.lit_pixels()
    );

    Ok(())
}
