use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FormError;

pub const MIN_SLEEP_HOURS: f64 = 4.0;
pub const MAX_SLEEP_HOURS: f64 = 12.0;
pub const SLEEP_STEP_HOURS: f64 = 0.25;
pub const MIN_CAFFEINE: u32 = 1;
pub const MAX_CAFFEINE: u32 = 20;

/// Time of day the user wants to wake up, minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeTime(NaiveTime);

impl WakeTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn seconds_since_midnight(&self) -> u32 {
        self.hour() * 3600 + self.minute() * 60
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl Default for WakeTime {
    fn default() -> Self {
        Self(NaiveTime::MIN + chrono::TimeDelta::hours(7))
    }
}

impl fmt::Display for WakeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for WakeTime {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FormError::InvalidWakeTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(bad)?;
        let hour: u32 = h.parse().map_err(|_| bad())?;
        let minute: u32 = m.parse().map_err(|_| bad())?;
        Self::new(hour, minute).ok_or_else(bad)
    }
}

impl Serialize for WakeTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WakeTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Desired hours of sleep, kept in [4, 12] on a quarter-hour grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SleepAmount(f64);

impl SleepAmount {
    pub fn new(hours: f64) -> Result<Self, FormError> {
        if !hours.is_finite() {
            return Err(FormError::NonFiniteSleepAmount);
        }
        let snapped = (hours / SLEEP_STEP_HOURS).round() * SLEEP_STEP_HOURS;
        Ok(Self(snapped.clamp(MIN_SLEEP_HOURS, MAX_SLEEP_HOURS)))
    }

    pub fn hours(&self) -> f64 {
        self.0
    }

    /// Display text for the stepper, e.g. "8 hours" or "8.25 hours".
    pub fn label(&self) -> String {
        format!("{} hours", self.0)
    }
}

impl Default for SleepAmount {
    fn default() -> Self {
        Self(8.0)
    }
}

/// Daily caffeinated drinks, kept in [1, 20].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CaffeineIntake(u32);

impl CaffeineIntake {
    pub fn new(count: u32) -> Self {
        Self(count.clamp(MIN_CAFFEINE, MAX_CAFFEINE))
    }

    pub fn count(&self) -> u32 {
        self.0
    }
}

impl Default for CaffeineIntake {
    fn default() -> Self {
        Self(MIN_CAFFEINE)
    }
}

// ---------- Wire types ----------

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub wake_time: WakeTime,
    pub sleep_amount: f64,
    pub caffeine_intake: u32,
}

/// Partial form edit; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct FormUpdate {
    pub wake_time: Option<String>,
    pub sleep_amount: Option<f64>,
    pub caffeine_intake: Option<u32>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EstimateOut {
    pub recommended_bedtime: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FormSnapshot {
    pub wake_time: WakeTime,
    pub sleep_amount: SleepAmount,
    pub caffeine_intake: CaffeineIntake,
    pub sleep_amount_label: String,
    pub recommended_bedtime: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wake_time_parses_and_prints() {
        let w: WakeTime = "06:45".parse().unwrap();
        assert_eq!(w.hour(), 6);
        assert_eq!(w.minute(), 45);
        assert_eq!(w.seconds_since_midnight(), 6 * 3600 + 45 * 60);
        assert_eq!(w.to_string(), "06:45");
        assert_eq!(WakeTime::default().to_string(), "07:00");
    }

    #[test]
    fn wake_time_rejects_out_of_range() {
        assert!("24:00".parse::<WakeTime>().is_err());
        assert!("07:60".parse::<WakeTime>().is_err());
        assert!("seven".parse::<WakeTime>().is_err());
        assert!(WakeTime::new(23, 59).is_some());
    }

    #[test]
    fn sleep_amount_clamps_and_snaps() {
        assert_eq!(SleepAmount::new(2.0).unwrap().hours(), 4.0);
        assert_eq!(SleepAmount::new(13.5).unwrap().hours(), 12.0);
        assert_eq!(SleepAmount::new(8.3).unwrap().hours(), 8.25);
        assert_eq!(SleepAmount::new(f64::NAN), Err(FormError::NonFiniteSleepAmount));
    }

    #[test]
    fn sleep_amount_label_matches_stepper() {
        assert_eq!(SleepAmount::default().label(), "8 hours");
        assert_eq!(SleepAmount::new(8.25).unwrap().label(), "8.25 hours");
    }

    #[test]
    fn caffeine_is_clamped() {
        assert_eq!(CaffeineIntake::new(0).count(), 1);
        assert_eq!(CaffeineIntake::new(35).count(), 20);
        assert_eq!(CaffeineIntake::new(3).count(), 3);
    }

    #[test]
    fn estimate_request_from_json() {
        let req: EstimateRequest = serde_json::from_str(
            r#"{"wake_time":"07:30","sleep_amount":7.5,"caffeine_intake":2}"#,
        )
        .unwrap();
        assert_eq!(req.wake_time, WakeTime::new(7, 30).unwrap());
        assert_eq!(req.caffeine_intake, 2);
    }
}
