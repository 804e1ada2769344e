//! Local wall-clock access for the "now" marker and the clock band.
//!
//! The device clock may not be synchronized yet, so every lookup can come
//! back empty. Callers treat that as "nothing to draw", never as an error.

use chrono::{DateTime, FixedOffset, Timelike, Utc};

/// Local wall-clock fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl LocalTime {
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self { hour, minute, second }
    }

    /// Fractional hour of day, e.g. 15:30 → 15.5.
    pub fn fractional_hour(&self) -> f32 {
        self.hour as f32 + self.minute as f32 / 60.0
    }
}

/// Clock provider.
pub trait Clock {
    fn try_local_time(&self) -> Option<LocalTime>;
}

/// System clock viewed through a fixed UTC offset.
///
/// Uses the same offset the forecast reports, so the marker lines up with
/// the location's grid rather than the host's timezone.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn with_offset(utc_offset_seconds: i64) -> Self {
        let offset = i32::try_from(utc_offset_seconds)
            .ok()
            .and_then(FixedOffset::east_opt);
        Self { offset }
    }

    /// The current UTC epoch, used as the resampler's reference instant.
    pub fn now_epoch() -> i64 {
        Utc::now().timestamp()
    }

    fn local_at(&self, now: DateTime<Utc>) -> Option<LocalTime> {
        let local = now.with_timezone(&self.offset?);
        Some(LocalTime::new(local.hour(), local.minute(), local.second()))
    }
}

impl Clock for SystemClock {
    fn try_local_time(&self) -> Option<LocalTime> {
        self.local_at(Utc::now())
    }
}

/// Clock that always reports the same value (or none).
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedClock(pub Option<LocalTime>);

impl Clock for FixedClock {
    fn try_local_time(&self) -> Option<LocalTime> {
        self.0
    }
}

/// 12-hour `HH:MM:SS AM` string, or `--:--:--` when the time is unknown.
pub fn format_time_12h(time: Option<LocalTime>) -> String {
    match time {
        Some(t) => format!(
            "{:02}:{:02}:{:02} {}",
            hour_12(t.hour),
            t.minute,
            t.second,
            if t.hour >= 12 { "PM" } else { "AM" }
        ),
        None => "--:--:--".to_string(),
    }
}

/// 24-hour to 12-hour clock hour (0 and 12 both map to 12).
pub fn hour_12(hour24: u32) -> u32 {
    match hour24 % 12 {
        0 => 12,
        h => h,
    }
}

/// Compact `3pm` / `9am` label.
pub fn compact_hour_label(hour24: u32) -> String {
    format!("{}{}", hour_12(hour24), if hour24 % 24 >= 12 { "pm" } else { "am" })
}
