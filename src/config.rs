use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::estimator::ClockStyle;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub bind_host: String,
    pub port: u16,
    pub model_path: String,
    pub clock: ClockStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            model_path: "models/sleep_calculator.json".to_string(),
            clock: ClockStyle::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("invalid config JSON in {}", path.display()))
    }

    /// Reads `BETTER_REST_CONFIG` (if set), then applies `MODEL_PATH` and
    /// `PORT` overrides.
    pub fn from_env() -> Result<Self> {
        let mut cfg = match std::env::var("BETTER_REST_CONFIG") {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };
        cfg.apply_overrides(
            std::env::var("MODEL_PATH").ok(),
            std::env::var("PORT").ok(),
        );
        Ok(cfg)
    }

    fn apply_overrides(&mut self, model_path: Option<String>, port: Option<String>) {
        if let Some(p) = model_path {
            self.model_path = p;
        }
        if let Some(port) = port.and_then(|s| s.parse().ok()) {
            self.port = port;
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"clock":"24h","port":9000}}"#).unwrap();
        let cfg = AppConfig::load(f.path()).unwrap();
        assert_eq!(cfg.clock, ClockStyle::TwentyFourHour);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.model_path, AppConfig::default().model_path);
    }

    #[test]
    fn bad_json_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "clock = 24h").unwrap();
        let err = AppConfig::load(f.path()).unwrap_err();
        assert!(err.to_string().contains("invalid config JSON"));
    }

    #[test]
    fn overrides_ignore_unparseable_port() {
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(Some("/srv/model.json".into()), Some("http".into()));
        assert_eq!(cfg.model_path, "/srv/model.json");
        assert_eq!(cfg.port, DEFAULT_PORT);
    }
}
