//! # Hourly Graph Rendering
//!
//! Turns one [`LocalHourSeries`] into a draw plan for a small rectangle: a
//! bordered plot with gridlines, value labels, hour ticks, the series
//! polyline, min/max annotations and a "now" marker. The same module also
//! renders an ASCII chart for terminal development mode.
//!
//! ## Coordinate Mapping
//! ```text
//! x(i) = x + 1 + round(i / 12 * (w - 3))               inside the 1 px border
//! y(v) = y + (h - 1) - round(clamp(frac(v), 0, 1) * (h - 1))
//! ```
//! where `frac(v)` maps the padded `[min, max]` range onto `[0, 1]`, so
//! larger values sit higher on screen.

use crate::canvas::{palette, Canvas, DrawPlan};
use crate::clock::{compact_hour_label, hour_12, Clock, LocalTime};
use crate::{LocalHourSeries, Metric, FIRST_HOUR, GRAPH_HOURS};
use embedded_graphics::pixelcolor::Rgb565;
use log::debug;

/// Hours that get a tick and label on the x axis.
const MAJOR_TICKS: [u32; 5] = [9, 12, 15, 18, 21];

/// Number of equal intervals the value axis is split into.
const GRID_INTERVALS: i32 = 4;

/// Text shown when the selected metric has nothing to plot.
pub const NO_DATA_LABEL: &str = "No graph data";

/// Drawing rectangle in absolute pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphArea {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl GraphArea {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Anything 8 px or smaller in either direction is not worth drawing.
    pub fn is_drawable(&self) -> bool {
        self.w > 8 && self.h > 8
    }

    /// Pixel column for a position along the hour axis (0.0 = 09:00, 1.0 = 21:00).
    pub fn x_at(&self, frac: f32) -> i32 {
        self.x + 1 + (frac * (self.w - 3) as f32).round() as i32
    }

    /// Pixel column of grid index `i`.
    pub fn x_for_index(&self, i: usize) -> i32 {
        self.x_at(i as f32 / (GRAPH_HOURS - 1) as f32)
    }

    /// Pixel row for a fraction of the value range (0.0 = bottom, 1.0 = top).
    pub fn y_at(&self, frac: f32) -> i32 {
        let frac = frac.clamp(0.0, 1.0);
        self.y + (self.h - 1) - (frac * (self.h - 1) as f32).round() as i32
    }
}

/// Y-axis value range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub min: f32,
    pub max: f32,
}

impl ValueScale {
    /// Raw min/max of the given values, `None` when there are none.
    pub fn from_values<I: IntoIterator<Item = f32>>(values: I) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(s) => Some(Self {
                min: s.min.min(v),
                max: s.max.max(v),
            }),
        })
    }

    /// Widen by 12% of the span (at least 0.5) on each side; never zero-width.
    pub fn padded(self) -> Self {
        let padding = ((self.max - self.min) * 0.12).max(0.5);
        let (mut min, mut max) = (self.min - padding, self.max + padding);
        if min == max {
            min -= 1.0;
            max += 1.0;
        }
        Self { min, max }
    }

    /// Position of `value` within the range, 0.0 at `min` and 1.0 at `max`.
    pub fn fraction(&self, value: f32) -> f32 {
        (value - self.min) / (self.max - self.min)
    }
}

fn metric_color(metric: Metric) -> Rgb565 {
    match metric {
        Metric::Temperature => palette::TEMPERATURE,
        Metric::Wind => palette::WIND,
        Metric::Precipitation => palette::PRECIPITATION,
    }
}

fn metric_title(metric: Metric) -> &'static str {
    match metric {
        Metric::Temperature => "Temperature (F)",
        Metric::Wind => "Wind (mph)",
        Metric::Precipitation => "Precip %",
    }
}

fn is_percent(metric: Metric) -> bool {
    metric == Metric::Precipitation
}

/// Values as plotted: precipitation probability becomes a percentage.
///
/// Works on a copy; the series itself keeps its native 0..1 values.
pub fn plot_values(metric: Metric, series: &LocalHourSeries) -> [Option<f32>; GRAPH_HOURS] {
    let factor = if is_percent(metric) { 100.0 } else { 1.0 };
    let mut points = [None; GRAPH_HOURS];
    for (i, point) in points.iter_mut().enumerate() {
        *point = series.get(i).map(|v| v * factor);
    }
    points
}

/// Normalize negative zero so labels never read "-0".
fn tidy(value: f32) -> f32 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Gridline label: whole percent for precipitation, otherwise at most one decimal.
fn format_axis_value(value: f32, percent: bool) -> String {
    if percent {
        return format!("{}%", tidy(value.round()) as i32);
    }
    let rounded = tidy((value * 10.0).round() / 10.0);
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

fn format_extreme(prefix: &str, value: f32, percent: bool) -> String {
    let rounded = tidy(value.round());
    if percent {
        format!("{} {}%", prefix, rounded as i32)
    } else {
        format!("{} {:.0}", prefix, rounded)
    }
}

/// Hourly graph renderer. The drawing rectangle is its only state.
#[derive(Clone, Copy, Debug, Default)]
pub struct GraphRenderer {
    area: GraphArea,
}

impl GraphRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_graph_area(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.area = GraphArea::new(x, y, w, h);
    }

    pub fn area(&self) -> GraphArea {
        self.area
    }

    /// Draw `metric` from `series` onto `canvas`, asking `clock` for the marker time.
    pub fn render<C: Canvas + ?Sized>(
        &self,
        metric: Metric,
        series: &LocalHourSeries,
        clock: &dyn Clock,
        canvas: &mut C,
    ) {
        self.plan(metric, series, clock.try_local_time()).replay(canvas);
    }

    /// Build the full draw plan. An undrawable area yields an empty plan.
    pub fn plan(
        &self,
        metric: Metric,
        series: &LocalHourSeries,
        now: Option<LocalTime>,
    ) -> DrawPlan {
        let area = self.area;
        let mut plan = DrawPlan::new();
        if !area.is_drawable() {
            debug!("Graph: area {:?} too small, skipping", area);
            return plan;
        }

        plan.fill_rect(area.x, area.y, area.w, area.h, palette::BACKGROUND);
        plan.draw_rect(area.x, area.y, area.w, area.h, palette::AXIS);

        let points = plot_values(metric, series);
        let Some(raw) = ValueScale::from_values(points.iter().flatten().copied()) else {
            debug!("Graph: no plottable {:?} values", metric);
            plan.text_at(
                area.x + 6,
                area.y + area.h / 2 - 6,
                1,
                palette::TEXT,
                NO_DATA_LABEL,
            );
            return plan;
        };
        let scale = raw.padded();
        let percent = is_percent(metric);
        debug!(
            "Graph: {:?} raw {:.2}..{:.2}, axis {:.2}..{:.2}",
            metric, raw.min, raw.max, scale.min, scale.max
        );

        self.plan_grid(&mut plan, &scale, percent);
        self.plan_hour_ticks(&mut plan);
        self.plan_polyline(&mut plan, &points, &scale, metric_color(metric));

        plan.text_at(area.x + 6, area.y + 4, 1, palette::TEXT, metric_title(metric));
        plan.set_cursor(area.x + area.w - 60, area.y + 4);
        plan.print(&format_extreme("Max", scale.max, percent));
        plan.set_cursor(area.x + area.w - 60, area.y + area.h - 12);
        plan.print(&format_extreme("Min", scale.min, percent));

        if let Some(now) = now {
            self.plan_marker(&mut plan, &points, &scale, now);
        }
        plan
    }

    fn plan_grid(&self, plan: &mut DrawPlan, scale: &ValueScale, percent: bool) {
        let area = self.area;
        plan.set_text_size(1);
        plan.set_text_color(palette::TEXT);
        for gi in 0..=GRID_INTERVALS {
            let yy = area.y + (gi * (area.h - 1)) / GRID_INTERVALS;
            plan.draw_hline(area.x + 1, yy, area.w - 2, palette::GRID);
            let value = scale.max - gi as f32 * (scale.max - scale.min) / GRID_INTERVALS as f32;
            plan.set_cursor(area.x + 4, yy - 6);
            plan.print(&format_axis_value(value, percent));
        }
    }

    fn plan_hour_ticks(&self, plan: &mut DrawPlan) {
        let area = self.area;
        plan.set_text_size(1);
        for hour in MAJOR_TICKS {
            let xx = area.x_for_index((hour - FIRST_HOUR) as usize);
            plan.draw_vline(xx, area.y + area.h - 12, 8, palette::AXIS);
            plan.set_cursor(xx - 6, area.y + area.h - 10);
            plan.print(&hour_12(hour).to_string());
        }
    }

    fn plan_polyline(
        &self,
        plan: &mut DrawPlan,
        points: &[Option<f32>; GRAPH_HOURS],
        scale: &ValueScale,
        color: Rgb565,
    ) {
        let area = self.area;
        let pixel =
            |i: usize| points[i].map(|v| (area.x_for_index(i), area.y_at(scale.fraction(v))));

        for i in 0..GRAPH_HOURS - 1 {
            match (pixel(i), pixel(i + 1)) {
                (Some((x0, y0)), Some((x1, y1))) => {
                    plan.draw_line(x0, y0, x1, y1, color);
                    plan.fill_circle(x0, y0, 2, color);
                }
                // A gap breaks the line; the point stands alone
                (Some((x0, y0)), None) => plan.fill_circle(x0, y0, 2, color),
                _ => {}
            }
        }
        if let Some((x, y)) = pixel(GRAPH_HOURS - 1) {
            plan.fill_circle(x, y, 2, color);
        }
    }

    fn plan_marker(
        &self,
        plan: &mut DrawPlan,
        points: &[Option<f32>; GRAPH_HOURS],
        scale: &ValueScale,
        now: LocalTime,
    ) {
        let area = self.area;
        let span = (GRAPH_HOURS - 1) as f32;
        let cur_pos = now.fractional_hour() - FIRST_HOUR as f32;
        if !(0.0..=span).contains(&cur_pos) {
            debug!("Graph: {:02}:{:02} is outside the plotted hours", now.hour, now.minute);
            return;
        }

        let marker_x = area.x_at(cur_pos / span);
        plan.draw_vline(marker_x, area.y + 2, area.h - 4, palette::MARKER);

        let marker_y = marker_value(points, cur_pos)
            .map(|v| area.y_at(scale.fraction(v)))
            .unwrap_or(area.y + area.h - 4);
        plan.fill_circle(marker_x, marker_y, 4, palette::MARKER);

        let label_x = marker_x + 6;
        let label_y = (area.y + 6).max(marker_y - 10);
        plan.fill_rect(label_x - 2, label_y - 2, 60, 12, palette::BACKGROUND);
        plan.text_at(label_x, label_y, 1, palette::MARKER, &compact_hour_label(now.hour));
    }
}

/// Series value at a fractional grid position, interpolated between the two
/// surrounding whole hours. `None` unless both are plottable.
pub fn marker_value(points: &[Option<f32>; GRAPH_HOURS], cur_pos: f32) -> Option<f32> {
    if !(0.0..=(GRAPH_HOURS - 1) as f32).contains(&cur_pos) {
        return None;
    }
    let left = cur_pos.floor() as usize;
    let right = (cur_pos.ceil() as usize).min(GRAPH_HOURS - 1);
    let (l, r) = (points[left]?, points[right]?);
    Some(l + (r - l) * (cur_pos - left as f32))
}

/// Render one metric as a terminal chart.
///
/// Each hour gets a 4-character column; rows run from the padded maximum
/// at the top down to the padded minimum.
pub fn ascii_chart(metric: Metric, series: &LocalHourSeries) -> String {
    const ROWS: usize = 12;
    const COLUMN: usize = 4;
    const Y_AXIS_WIDTH: usize = 6;

    let points = plot_values(metric, series);
    let mut out = format!("{}\n", metric_title(metric));
    let Some(raw) = ValueScale::from_values(points.iter().flatten().copied()) else {
        out.push_str(NO_DATA_LABEL);
        out.push('\n');
        return out;
    };
    let scale = raw.padded();
    let percent = is_percent(metric);

    let value_to_row =
        |v: f32| ((1.0 - scale.fraction(v).clamp(0.0, 1.0)) * (ROWS - 1) as f32).round() as usize;

    let width = GRAPH_HOURS * COLUMN;
    let mut grid = vec![vec![' '; width]; ROWS];
    for (i, point) in points.iter().enumerate() {
        if let Some(v) = point {
            grid[value_to_row(*v)][i * COLUMN + 1] = '•';
        }
    }

    for (row, cells) in grid.into_iter().enumerate() {
        let label = match row {
            0 => format_axis_value(scale.max, percent),
            r if r == ROWS - 1 => format_axis_value(scale.min, percent),
            _ => String::new(),
        };
        let line: String = cells.into_iter().collect();
        out.push_str(&format!("{:>w$}│{}\n", label, line.trim_end(), w = Y_AXIS_WIDTH - 1));
    }

    out.push_str(&" ".repeat(Y_AXIS_WIDTH));
    for i in 0..GRAPH_HOURS {
        let hour = LocalHourSeries::hour_label(i);
        let label = if MAJOR_TICKS.contains(&hour) {
            hour_12(hour).to_string()
        } else {
            String::new()
        };
        out.push_str(&format!("{:<w$}", label, w = COLUMN));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawCommand;

    fn ramp_series() -> LocalHourSeries {
        let mut series = LocalHourSeries::empty();
        for i in 0..GRAPH_HOURS {
            series.values[i] = 60.0 + i as f32;
            series.valid[i] = true;
        }
        series
    }

    fn renderer() -> GraphRenderer {
        let mut r = GraphRenderer::new();
        r.set_graph_area(10, 20, 200, 120);
        r
    }

    fn count(plan: &DrawPlan, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        plan.commands().iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_scale_padding() {
        let scale = ValueScale::from_values([60.0, 70.0]).unwrap().padded();
        assert!((scale.min - 58.8).abs() < 1e-4);
        assert!((scale.max - 71.2).abs() < 1e-4);

        // Flat series gets the 0.5 minimum padding
        let flat = ValueScale::from_values([5.0]).unwrap().padded();
        assert_eq!((flat.min, flat.max), (4.5, 5.5));

        assert!(ValueScale::from_values(std::iter::empty()).is_none());
    }

    #[test]
    fn test_axis_value_formatting() {
        assert_eq!(format_axis_value(70.0, false), "70");
        assert_eq!(format_axis_value(70.46, false), "70.5");
        assert_eq!(format_axis_value(-0.02, false), "0");
        assert_eq!(format_axis_value(12.6, true), "13%");
        assert_eq!(format_extreme("Max", 71.2, false), "Max 71");
        assert_eq!(format_extreme("Min", -0.4, true), "Min 0%");
    }

    #[test]
    fn test_area_mapping() {
        let area = GraphArea::new(10, 20, 200, 120);
        assert_eq!(area.x_for_index(0), 11);
        assert_eq!(area.x_for_index(GRAPH_HOURS - 1), 11 + 197);
        assert_eq!(area.y_at(0.0), 20 + 119);
        assert_eq!(area.y_at(1.0), 20);
        assert_eq!(area.y_at(2.0), 20);
    }

    #[test]
    fn test_degenerate_area_draws_nothing() {
        let mut r = GraphRenderer::new();
        r.set_graph_area(0, 0, 8, 100);
        assert!(r.plan(Metric::Temperature, &ramp_series(), None).is_empty());
        assert!(GraphRenderer::new().plan(Metric::Wind, &ramp_series(), None).is_empty());
    }

    #[test]
    fn test_full_series_draws_connected_polyline() {
        let plan = renderer().plan(Metric::Temperature, &ramp_series(), None);
        let lines = count(&plan, |c| {
            matches!(c, DrawCommand::Line { color, .. } if *color == palette::TEMPERATURE)
        });
        let dots = count(&plan, |c| {
            matches!(c, DrawCommand::FillCircle { color, .. } if *color == palette::TEMPERATURE)
        });
        assert_eq!(lines, GRAPH_HOURS - 1);
        assert_eq!(dots, GRAPH_HOURS);
    }

    #[test]
    fn test_gap_breaks_polyline() {
        let mut series = ramp_series();
        series.valid[5] = false;
        series.values[5] = f32::NAN;
        let plan = renderer().plan(Metric::Temperature, &series, None);
        let lines = count(&plan, |c| matches!(c, DrawCommand::Line { .. }));
        // Segments 4-5 and 5-6 disappear
        assert_eq!(lines, GRAPH_HOURS - 3);
    }

    #[test]
    fn test_labels_and_ticks() {
        let plan = renderer().plan(Metric::Temperature, &ramp_series(), None);
        let texts = plan.texts();
        for tick in ["9", "12", "3", "6"] {
            assert!(texts.contains(&tick), "missing tick {tick}");
        }
        assert!(texts.contains(&"Temperature (F)"));
        assert!(texts.iter().any(|t| t.starts_with("Max ")));
        assert!(texts.iter().any(|t| t.starts_with("Min ")));
        let grid_lines = count(&plan, |c| {
            matches!(c, DrawCommand::HLine { color, .. } if *color == palette::GRID)
        });
        assert_eq!(grid_lines, (GRID_INTERVALS + 1) as usize);
    }

    #[test]
    fn test_precipitation_rendered_as_percent_without_mutating_series() {
        let mut series = LocalHourSeries::empty();
        for i in 0..GRAPH_HOURS {
            series.values[i] = 0.25;
            series.valid[i] = true;
        }
        let plan = renderer().plan(Metric::Precipitation, &series, None);
        assert!(plan.texts().contains(&"Max 26%"));
        assert!(plan.texts().contains(&"Min 25%"));
        assert_eq!(series.values[0], 0.25);
    }

    #[test]
    fn test_marker_value_interpolates() {
        let points = plot_values(Metric::Temperature, &ramp_series());
        assert_eq!(marker_value(&points, 6.0), Some(66.0));
        assert_eq!(marker_value(&points, 6.5), Some(66.5));
        assert_eq!(marker_value(&points, 12.5), None);
    }

    #[test]
    fn test_marker_fallback_when_bracket_missing() {
        let mut series = ramp_series();
        series.valid[7] = false;
        series.values[7] = f32::NAN;
        let r = renderer();
        let plan = r.plan(Metric::Temperature, &series, Some(LocalTime::new(15, 30, 0)));
        let area = r.area();
        assert!(plan.commands().contains(&DrawCommand::FillCircle {
            x: area.x_at(6.5 / 12.0),
            y: area.y + area.h - 4,
            r: 4,
            color: palette::MARKER,
        }));
        assert!(plan.texts().contains(&"3pm"));
    }

    #[test]
    fn test_ascii_chart() {
        let chart = ascii_chart(Metric::Wind, &ramp_series());
        assert!(chart.starts_with("Wind (mph)"));
        assert_eq!(chart.matches('•').count(), GRAPH_HOURS);

        let empty = ascii_chart(Metric::Wind, &LocalHourSeries::empty());
        assert!(empty.contains(NO_DATA_LABEL));
    }
}
