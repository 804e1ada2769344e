//! Update cycle: recompute, publish on success, render the published series.
//!
//! A refresh resamples into a fresh [`HourlyForecast`] and only replaces the
//! published one when at least one hour resolved. A failed cycle therefore
//! leaves the screen showing the last good forecast.

use crate::canvas::Canvas;
use crate::clock::Clock;
use crate::forecast::ForecastSource;
use crate::renderer::GraphRenderer;
use crate::resampler::resample;
use crate::{HourlyForecast, LocalHourSeries, Metric, ResampleStatus};
use log::{info, warn};

/// Owns the published forecast and the graph renderer.
#[derive(Debug, Default)]
pub struct Dashboard {
    published: Option<HourlyForecast>,
    renderer: GraphRenderer,
    smooth: bool,
}

impl Dashboard {
    pub fn new(smooth: bool) -> Self {
        Self {
            published: None,
            renderer: GraphRenderer::new(),
            smooth,
        }
    }

    pub fn set_graph_area(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.renderer.set_graph_area(x, y, w, h);
    }

    pub fn renderer(&self) -> &GraphRenderer {
        &self.renderer
    }

    pub fn published(&self) -> Option<&HourlyForecast> {
        self.published.as_ref()
    }

    /// Recompute from `source` for the local day containing `reference_utc_epoch`.
    ///
    /// Returns the status of the new pass; the published forecast changes only
    /// when that status is [`ResampleStatus::Ok`].
    pub fn refresh<S: ForecastSource + ?Sized>(
        &mut self,
        source: &S,
        reference_utc_epoch: i64,
    ) -> ResampleStatus {
        let fresh = resample(
            &source.samples(),
            source.utc_offset_seconds(),
            reference_utc_epoch,
            self.smooth,
        );
        if fresh.any_valid() {
            self.published = Some(fresh);
            info!("Dashboard: published new hourly forecast");
        } else {
            warn!(
                "Dashboard: resample reported {:?}, keeping previous forecast",
                fresh.status
            );
        }
        fresh.status
    }

    /// Render `metric` of the published forecast onto `canvas`.
    pub fn draw<C: Canvas + ?Sized>(&self, metric: Metric, clock: &dyn Clock, canvas: &mut C) {
        let empty = LocalHourSeries::empty();
        let series = self
            .published
            .as_ref()
            .map_or(&empty, |forecast| forecast.series(metric));
        self.renderer.render(metric, series, clock, canvas);
    }
}
