use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::EstimationError;
use crate::model::{SleepFeatures, SleepModel};
use crate::types::WakeTime;

/// Shown in place of a bedtime whenever estimation fails.
pub const FALLBACK_MESSAGE: &str = "There was an error";

/// How the bedtime is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockStyle {
    /// "11:00 PM"
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    /// "23:00"
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl ClockStyle {
    pub fn format(&self, t: NaiveDateTime) -> String {
        match self {
            ClockStyle::TwelveHour => t.format("%-I:%M %p").to_string(),
            ClockStyle::TwentyFourHour => t.format("%H:%M").to_string(),
        }
    }
}

/// Turns the three form inputs into a recommended bedtime.
///
/// Pure apart from the model call: no I/O, no logging, no shared state.
#[derive(Clone)]
pub struct BedtimeEstimator {
    model: Arc<dyn SleepModel>,
    clock: ClockStyle,
}

impl BedtimeEstimator {
    pub fn new(model: impl SleepModel + 'static) -> Self {
        Self::from_shared(Arc::new(model))
    }

    pub fn from_shared(model: Arc<dyn SleepModel>) -> Self {
        Self {
            model,
            clock: ClockStyle::default(),
        }
    }

    pub fn with_clock(mut self, clock: ClockStyle) -> Self {
        self.clock = clock;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn try_estimate(
        &self,
        wake: WakeTime,
        sleep_hours: f64,
        caffeine: u32,
    ) -> Result<String, EstimationError> {
        let features = SleepFeatures {
            wake_seconds: f64::from(wake.seconds_since_midnight()),
            estimated_sleep_hours: sleep_hours,
            coffee: f64::from(caffeine),
        };
        let actual_sleep = self.model.predict(&features)?;
        let bedtime = bedtime_for(wake, actual_sleep)?;
        Ok(self.clock.format(bedtime))
    }

    /// Fail-soft variant: any error becomes [`FALLBACK_MESSAGE`].
    pub fn estimate(&self, wake: WakeTime, sleep_hours: f64, caffeine: u32) -> String {
        self.try_estimate(wake, sleep_hours, caffeine)
            .unwrap_or_else(|_| FALLBACK_MESSAGE.to_string())
    }
}

/// Wake instant on a reference day minus `actual_sleep_secs`.
pub fn bedtime_for(wake: WakeTime, actual_sleep_secs: f64) -> Result<NaiveDateTime, EstimationError> {
    let overflow = || EstimationError::TimeOverflow(actual_sleep_secs);
    let ms = (actual_sleep_secs * 1000.0).round();
    if ms.is_nan() || ms.abs() >= i64::MAX as f64 {
        return Err(overflow());
    }
    let delta = TimeDelta::try_milliseconds(ms as i64).ok_or_else(overflow)?;
    NaiveDate::default()
        .and_time(wake.as_naive())
        .checked_sub_signed(delta)
        .ok_or_else(overflow)
}
