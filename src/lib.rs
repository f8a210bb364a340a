//! Bedtime recommendations from a pre-trained sleep model.
//!
//! [`BedtimeEstimator`] turns a wake time, a desired amount of sleep and a
//! daily caffeine count into a short time-of-day string. The model sits
//! behind the [`SleepModel`] trait; [`SleepForm`] and [`server`] provide the
//! input surface around it.

pub mod config;
pub mod error;
pub mod estimator;
pub mod form;
pub mod model;
pub mod server;
pub mod types;

pub use error::{EstimationError, FormError, ModelError};
pub use estimator::{BedtimeEstimator, ClockStyle, FALLBACK_MESSAGE};
pub use form::SleepForm;
pub use model::{LinearSleepModel, SleepFeatures, SleepModel, UnavailableModel};
pub use types::{CaffeineIntake, SleepAmount, WakeTime};
