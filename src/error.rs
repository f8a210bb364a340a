use thiserror::Error;

/// Failures raised by a [`crate::model::SleepModel`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("sleep model unavailable: {0}")]
    Unavailable(String),
    #[error("model rejected input: {0}")]
    InvalidInput(String),
    #[error("model produced an unusable prediction: {0}")]
    InvalidOutput(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("bedtime out of range for {0} seconds of sleep")]
    TimeOverflow(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("invalid wake time {0:?}, expected HH:MM")]
    InvalidWakeTime(String),
    #[error("sleep amount must be a finite number of hours")]
    NonFiniteSleepAmount,
}
