use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::ModelError;

/// Feature names understood by the bundled artifact.
pub const FEAT_WAKE: &str = "wake";
pub const FEAT_ESTIMATED_SLEEP: &str = "estimatedSleep";
pub const FEAT_COFFEE: &str = "coffee";

/// Inputs handed to the model, in the units it was trained on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepFeatures {
    pub wake_seconds: f64,
    pub estimated_sleep_hours: f64,
    pub coffee: f64,
}

impl SleepFeatures {
    fn get(&self, name: &str) -> Option<f64> {
        match name {
            FEAT_WAKE => Some(self.wake_seconds),
            FEAT_ESTIMATED_SLEEP => Some(self.estimated_sleep_hours),
            FEAT_COFFEE => Some(self.coffee),
            _ => None,
        }
    }
}

/// Predicts how many seconds of sleep the user will actually get.
pub trait SleepModel: Send + Sync {
    fn predict(&self, features: &SleepFeatures) -> Result<f64, ModelError>;

    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> SleepModel for F
where
    F: Fn(&SleepFeatures) -> Result<f64, ModelError> + Send + Sync,
{
    fn predict(&self, features: &SleepFeatures) -> Result<f64, ModelError> {
        self(features)
    }
}

#[derive(Deserialize)]
struct ArtifactJson {
    feat_list: Vec<String>,
    coefficients: Vec<f64>,
    #[serde(default)]
    intercept: f64,
}

/// Linear regressor loaded from a JSON artifact.
#[derive(Debug, Clone)]
pub struct LinearSleepModel {
    feat_list: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearSleepModel {
    pub fn new(feat_list: Vec<String>, coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        if feat_list.len() != coefficients.len() {
            bail!(
                "feature length mismatch: {} features, {} coefficients",
                feat_list.len(),
                coefficients.len()
            );
        }
        for required in [FEAT_WAKE, FEAT_ESTIMATED_SLEEP, FEAT_COFFEE] {
            if !feat_list.iter().any(|f| f == required) {
                bail!("artifact is missing feature {:?}", required);
            }
        }
        let probe = SleepFeatures {
            wake_seconds: 0.0,
            estimated_sleep_hours: 0.0,
            coffee: 0.0,
        };
        if let Some(unknown) = feat_list.iter().find(|f| probe.get(f).is_none()) {
            bail!("artifact uses unknown feature {:?}", unknown);
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            bail!("artifact contains non-finite weights");
        }
        Ok(Self {
            feat_list,
            coefficients,
            intercept,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path)
            .with_context(|| format!("failed to read model artifact at {}", path.display()))?;
        let art: ArtifactJson =
            serde_json::from_str(&txt).with_context(|| "failed to parse model artifact")?;
        Self::new(art.feat_list, art.coefficients, art.intercept)
            .with_context(|| format!("invalid model artifact {}", path.display()))
    }

    pub fn feat_list(&self) -> &[String] {
        &self.feat_list
    }
}

impl SleepModel for LinearSleepModel {
    fn predict(&self, features: &SleepFeatures) -> Result<f64, ModelError> {
        let mut y = self.intercept;
        for (name, w) in self.feat_list.iter().zip(&self.coefficients) {
            // feature names are checked at construction
            let x = features.get(name).unwrap_or(0.0);
            if !x.is_finite() {
                return Err(ModelError::InvalidInput(format!("{name}={x}")));
            }
            y += w * x;
        }
        if !y.is_finite() || y < 0.0 {
            return Err(ModelError::InvalidOutput(y));
        }
        Ok(y)
    }

    fn name(&self) -> &str {
        "linear"
    }
}

/// Stand-in for a model whose artifact could not be loaded.
#[derive(Debug, Clone)]
pub struct UnavailableModel {
    reason: String,
}

impl UnavailableModel {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SleepModel for UnavailableModel {
    fn predict(&self, _features: &SleepFeatures) -> Result<f64, ModelError> {
        Err(ModelError::Unavailable(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn feats(wake: f64, sleep: f64, coffee: f64) -> SleepFeatures {
        SleepFeatures {
            wake_seconds: wake,
            estimated_sleep_hours: sleep,
            coffee,
        }
    }

    fn default_list() -> Vec<String> {
        vec![FEAT_WAKE.into(), FEAT_ESTIMATED_SLEEP.into(), FEAT_COFFEE.into()]
    }

    #[test]
    fn linear_predicts_weighted_sum() {
        let m = LinearSleepModel::new(default_list(), vec![0.0, 3600.0, -300.0], 600.0).unwrap();
        let y = m.predict(&feats(25200.0, 8.0, 2.0)).unwrap();
        assert_eq!(y, 600.0 + 8.0 * 3600.0 - 600.0);
    }

    #[test]
    fn linear_rejects_bad_numbers() {
        let m = LinearSleepModel::new(default_list(), vec![0.0, 3600.0, 0.0], 0.0).unwrap();
        assert!(matches!(
            m.predict(&feats(0.0, f64::INFINITY, 1.0)),
            Err(ModelError::InvalidInput(_))
        ));
        assert!(matches!(
            m.predict(&feats(0.0, -2.0, 1.0)),
            Err(ModelError::InvalidOutput(_))
        ));
    }

    #[test]
    fn construction_validates_features() {
        assert!(LinearSleepModel::new(default_list(), vec![1.0], 0.0).is_err());
        let unknown = vec![FEAT_WAKE.into(), FEAT_ESTIMATED_SLEEP.into(), "tea".into()];
        assert!(LinearSleepModel::new(unknown, vec![0.0; 3], 0.0).is_err());
    }

    #[test]
    fn load_respects_feature_order() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"feat_list":["coffee","estimatedSleep","wake"],"coefficients":[10.0,3600.0,0.0],"intercept":0.0}}"#
        )
        .unwrap();
        let m = LinearSleepModel::load(f.path()).unwrap();
        assert_eq!(m.feat_list()[0], "coffee");
        assert_eq!(m.predict(&feats(1.0, 1.0, 1.0)).unwrap(), 3610.0);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = LinearSleepModel::load("/nonexistent/sleep_model.json").unwrap_err();
        assert!(err.to_string().contains("failed to read model artifact"));
    }

    #[test]
    fn unavailable_always_fails() {
        let m = UnavailableModel::new("missing artifact");
        assert_eq!(
            m.predict(&feats(0.0, 8.0, 1.0)),
            Err(ModelError::Unavailable("missing artifact".into()))
        );
        assert_eq!(m.name(), "unavailable");
    }
}
