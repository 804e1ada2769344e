//! Full-screen rendering as done by the binary.

use crate::{render_screen, PREVIEW_CELL_H, PREVIEW_CELL_W};
use forecast_graph_lib::canvas::palette;
use forecast_graph_lib::clock::{FixedClock, LocalTime};
use forecast_graph_lib::config::Config;
use forecast_graph_lib::dashboard::Dashboard;
use forecast_graph_lib::forecast::StaticSource;
use forecast_graph_lib::panel::CurrentConditions;
use forecast_graph_lib::Metric;

use super::{local_hour, sample, OFFSET};

fn dashboard_for(config: &Config) -> Dashboard {
    let display = &config.display;
    let mut dashboard = Dashboard::new(config.forecast.smooth);
    dashboard.set_graph_area(
        display.graph_x,
        display.graph_y,
        display.graph_width,
        display.graph_height,
    );
    dashboard
}

/// Panel, graph and clock band all land in one framebuffer.
#[test]
fn screen_renders_panel_graph_and_clock() {
    let config = Config::default();
    let mut dashboard = dashboard_for(&config);
    let source = StaticSource {
        samples: vec![
            sample(9, Some(58.0), Some(4.0), Some(0.1)),
            sample(15, Some(71.0), Some(9.0), Some(0.6)),
            sample(21, Some(61.0), Some(3.0), Some(0.0)),
        ],
        utc_offset_seconds: OFFSET,
    };
    dashboard.refresh(&source, local_hour(12));

    let framebuffer = render_screen(
        &config,
        &dashboard,
        &CurrentConditions::default(),
        Metric::Wind,
        &FixedClock(Some(LocalTime::new(14, 0, 0))),
    );

    let display = &config.display;
    // Panel outline, graph outline and clock band divider
    assert_eq!(framebuffer.pixel(4, display.graph_y as u32), Some(palette::AXIS));
    assert_eq!(
        framebuffer.pixel(display.graph_x as u32, display.graph_y as u32),
        Some(palette::AXIS)
    );
    let band_top = (display.height - display.clock_band_height) as u32;
    assert_eq!(framebuffer.pixel(0, band_top), Some(palette::AXIS));
}

/// The terminal preview covers the whole screen, one character per cell.
#[test]
fn screen_preview_has_one_line_per_cell_row() {
    let config = Config::default();
    let framebuffer = render_screen(
        &config,
        &dashboard_for(&config),
        &CurrentConditions::default(),
        Metric::Temperature,
        &FixedClock(None),
    );

    let preview = framebuffer.to_ascii(PREVIEW_CELL_W, PREVIEW_CELL_H);
    let lines: Vec<&str> = preview.lines().collect();
    assert_eq!(lines.len(), (config.display.height as u32 / PREVIEW_CELL_H) as usize);
    assert!(lines
        .iter()
        .all(|l| l.chars().count() == (config.display.width as u32 / PREVIEW_CELL_W) as usize));
    assert!(preview.contains('#'), "outlines should show up in the preview");
}
