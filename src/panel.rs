//! Current-conditions side panel and the bottom clock band.

use crate::canvas::{palette, Canvas, DrawPlan};
use crate::forecast::ForecastPayload;
use crate::renderer::GraphArea;

const BOX_GAP: i32 = 4;
const TITLES: [&str; 3] = ["Now Temp", "Wind", "Humidity"];
const NOT_AVAILABLE: &str = "N/A";

/// Current temperature, wind and humidity, taken from the first forecast entry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CurrentConditions {
    pub temperature: Option<f32>,
    pub wind_speed: Option<f32>,
    pub humidity: Option<i32>,
}

impl CurrentConditions {
    pub fn from_payload(payload: &ForecastPayload) -> Self {
        payload
            .first_entry()
            .map(|first| Self {
                temperature: first.temperature().filter(|t| !t.is_nan()),
                wind_speed: first.wind_speed().filter(|w| !w.is_nan()),
                humidity: first.humidity(),
            })
            .unwrap_or_default()
    }

    /// Display strings in box order: `72F`, `5 mph`, `40%`, or `N/A`.
    pub fn values(&self) -> [String; 3] {
        [
            self.temperature
                .map_or_else(|| NOT_AVAILABLE.to_string(), |t| format!("{}F", t.round() as i32)),
            self.wind_speed
                .map_or_else(|| NOT_AVAILABLE.to_string(), |w| format!("{} mph", w.round() as i32)),
            self.humidity
                .map_or_else(|| NOT_AVAILABLE.to_string(), |h| format!("{h}%")),
        ]
    }

    /// Three stacked boxes filling `area`, each with a title and a large value.
    pub fn plan(&self, area: GraphArea) -> DrawPlan {
        let mut plan = DrawPlan::new();
        let box_h = (area.h - BOX_GAP * 2) / 3;
        if area.w <= 0 || box_h <= 0 {
            return plan;
        }

        for (i, (title, value)) in TITLES.iter().zip(self.values()).enumerate() {
            let by = area.y + i as i32 * (box_h + BOX_GAP);
            plan.fill_rect(area.x, by, area.w, box_h, palette::BACKGROUND);
            plan.draw_rect(area.x, by, area.w, box_h, palette::AXIS);
            plan.text_at(area.x + 6, by + 4, 1, palette::TEXT, title);
            // nudged down to clear the title
            plan.text_at(area.x + 6, by + box_h / 2 - 2, 2, palette::TEXT, &value);
        }
        plan.set_text_size(1);
        plan
    }
}

/// Clear the bottom band of the screen and print `text` in it.
pub fn plan_clock_band(screen_w: i32, screen_h: i32, band_h: i32, text: &str) -> DrawPlan {
    let mut plan = DrawPlan::new();
    let band_top = screen_h - band_h;
    plan.fill_rect(0, band_top, screen_w, band_h, palette::BACKGROUND);
    plan.draw_hline(0, band_top, screen_w, palette::AXIS);

    let cursor_y = (band_top + 8).clamp(0, (screen_h - 8).max(0));
    plan.text_at(6, cursor_y, 2, palette::CLOCK, text);
    plan
}
