use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use serde_json::json;
use std::sync::Arc;

use crate::estimator::BedtimeEstimator;
use crate::form::SleepForm;
use crate::types::{
    CaffeineIntake, EstimateOut, EstimateRequest, FormSnapshot, FormUpdate, SleepAmount,
};

type ApiError = (StatusCode, Json<serde_json::Value>);

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub estimator: Arc<BedtimeEstimator>,
    pub form: Arc<RwLock<SleepForm>>,
}

impl AppState {
    pub fn new(estimator: BedtimeEstimator) -> Self {
        Self {
            estimator: Arc::new(estimator),
            form: Arc::new(RwLock::new(SleepForm::new())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/form", get(get_form).patch(patch_form))
        .route("/estimate", post(estimate))
        .route("/health", get(health))
        .with_state(state)
}

// ---------- Handlers ----------

pub async fn get_form(State(state): State<AppState>) -> Json<FormSnapshot> {
    let form = *state.form.read();
    Json(form.snapshot(&state.estimator))
}

pub async fn patch_form(
    State(state): State<AppState>,
    Json(update): Json<FormUpdate>,
) -> Result<Json<FormSnapshot>, ApiError> {
    let form = {
        let mut guard = state.form.write();
        guard.apply(&update).map_err(|e| {
            tracing::debug!("rejected form update: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": e.to_string() })),
            )
        })?;
        *guard
    };
    let snap = form.snapshot(&state.estimator);
    tracing::debug!(
        "form updated wake={} sleep={} caffeine={} -> {}",
        snap.wake_time,
        snap.sleep_amount.hours(),
        snap.caffeine_intake.count(),
        snap.recommended_bedtime
    );
    Ok(Json(snap))
}

/// Stateless estimate with the same range handling as the form.
pub async fn estimate(
    State(state): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<EstimateOut>, ApiError> {
    let sleep = SleepAmount::new(req.sleep_amount).map_err(|e| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": e.to_string() })),
        )
    })?;
    let caffeine = CaffeineIntake::new(req.caffeine_intake);

    let recommended_bedtime =
        match state
            .estimator
            .try_estimate(req.wake_time, sleep.hours(), caffeine.count())
        {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("estimation failed: {}", e);
                crate::estimator::FALLBACK_MESSAGE.to_string()
            }
        };
    Ok(Json(EstimateOut {
        recommended_bedtime,
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "model": state.estimator.model_name() }))
}
