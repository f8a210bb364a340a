use crate::error::FormError;
use crate::estimator::BedtimeEstimator;
use crate::types::{CaffeineIntake, FormSnapshot, FormUpdate, SleepAmount, WakeTime};

/// The three inputs of the bedtime form. Each setter enforces the widget
/// range, so the stored values always satisfy it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SleepForm {
    wake_time: WakeTime,
    sleep_amount: SleepAmount,
    caffeine_intake: CaffeineIntake,
}

impl SleepForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wake_time(&self) -> WakeTime {
        self.wake_time
    }

    pub fn sleep_amount(&self) -> SleepAmount {
        self.sleep_amount
    }

    pub fn caffeine_intake(&self) -> CaffeineIntake {
        self.caffeine_intake
    }

    pub fn set_wake_time(&mut self, wake: WakeTime) {
        self.wake_time = wake;
    }

    pub fn set_sleep_amount(&mut self, hours: f64) -> Result<(), FormError> {
        self.sleep_amount = SleepAmount::new(hours)?;
        Ok(())
    }

    pub fn set_caffeine_intake(&mut self, count: u32) {
        self.caffeine_intake = CaffeineIntake::new(count);
    }

    /// Applies a partial edit. Validation happens before any field changes,
    /// so a rejected update leaves the form untouched.
    pub fn apply(&mut self, update: &FormUpdate) -> Result<(), FormError> {
        let wake = update
            .wake_time
            .as_deref()
            .map(str::parse::<WakeTime>)
            .transpose()?;
        let sleep = update.sleep_amount.map(SleepAmount::new).transpose()?;

        if let Some(w) = wake {
            self.wake_time = w;
        }
        if let Some(s) = sleep {
            self.sleep_amount = s;
        }
        if let Some(c) = update.caffeine_intake {
            self.set_caffeine_intake(c);
        }
        Ok(())
    }

    /// Recomputed on every call from the current inputs.
    pub fn recommendation(&self, estimator: &BedtimeEstimator) -> String {
        estimator.estimate(
            self.wake_time,
            self.sleep_amount.hours(),
            self.caffeine_intake.count(),
        )
    }

    pub fn snapshot(&self, estimator: &BedtimeEstimator) -> FormSnapshot {
        FormSnapshot {
            wake_time: self.wake_time,
            sleep_amount: self.sleep_amount,
            caffeine_intake: self.caffeine_intake,
            sleep_amount_label: self.sleep_amount.label(),
            recommended_bedtime: self.recommendation(estimator),
        }
    }
}
