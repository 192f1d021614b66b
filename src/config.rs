use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::constellation::{
    Constellation, ConstellationError, ExecutorSettings, SatelliteDescriptor,
};
use crate::propagate::{PropagateError, Propagator, TleCatalog};
use crate::sampler::NUM_STEPS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid worker_timeout: {0}")]
    WorkerTimeout(#[from] humantime::DurationError),
    #[error("worker_timeout must be greater than zero")]
    ZeroWorkerTimeout,
    #[error("TLE catalog: {0}")]
    Catalog(#[from] PropagateError),
    #[error("constellation: {0}")]
    Constellation(#[from] ConstellationError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory with `.tle` / `.txt` files
    pub tle_folder: PathBuf,
    #[serde(default = "default_num_steps")]
    pub num_steps: usize,
    /// humantime duration, e.g. "30s"
    #[serde(default = "default_worker_timeout")]
    pub worker_timeout: String,
    #[serde(default)]
    pub web: WebConfig,
    pub satellites: Vec<SatelliteDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_num_steps() -> usize {
    NUM_STEPS
}

fn default_worker_timeout() -> String {
    "60s".to_string()
}

impl Config {
    /// Relative `tle_folder` paths are resolved against the config file's directory
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_str(&content)?;
        if config.tle_folder.is_relative() {
            if let Some(dir) = path.parent() {
                config.tle_folder = dir.join(&config.tle_folder);
            }
        }
        Ok(config)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.settings()?;
        Ok(config)
    }

    pub fn worker_timeout(&self) -> Result<Duration, ConfigError> {
        let timeout = humantime::parse_duration(self.worker_timeout.trim())?;
        if timeout.is_zero() {
            return Err(ConfigError::ZeroWorkerTimeout);
        }
        Ok(timeout)
    }

    pub fn settings(&self) -> Result<ExecutorSettings, ConfigError> {
        Ok(ExecutorSettings {
            num_steps: self.num_steps,
            worker_timeout: self.worker_timeout()?,
        })
    }

    pub fn load_catalog(&self) -> Result<TleCatalog, ConfigError> {
        let catalog = TleCatalog::load_dir(&self.tle_folder)?;
        if catalog.is_empty() {
            log::warn!("No TLEs found in {}", self.tle_folder.display());
        }
        Ok(catalog)
    }

    /// Validated constellation over the configured satellites
    pub fn constellation(
        &self,
        propagator: Arc<dyn Propagator>,
    ) -> Result<Constellation, ConfigError> {
        Ok(Constellation::load(
            self.satellites.clone(),
            propagator,
            self.settings()?,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagate::tle_loader::tests::ISS_TLE;
    use crate::propagate::StubPropagator;
    use std::fs;

    const CONFIG: &str = r#"
tle_folder: tle
worker_timeout: 2m
web:
  bind: 127.0.0.1:9000
satellites:
  - name: ISS (ZARYA)
    speed: 120
  - name: NOAA 19
    orbit_count: 2
    track_color: [0, 255, 255, 255]
"#;

    #[test]
    fn parses_with_defaults() {
        let config = Config::from_str(CONFIG).unwrap();
        assert_eq!(config.num_steps, 255);
        assert_eq!(config.web.bind, "127.0.0.1:9000");
        assert_eq!(config.satellites.len(), 2);
        assert_eq!(config.satellites[0].speed, 120.0);
        assert_eq!(config.satellites[1].orbit_count, 2);
        assert_eq!(
            config.settings().unwrap(),
            ExecutorSettings {
                num_steps: 255,
                worker_timeout: Duration::from_secs(120),
            }
        );
    }

    #[test]
    fn default_bind_and_timeout() {
        let config = Config::from_str("tle_folder: /tmp\nsatellites: []").unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.worker_timeout().unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = Config::from_str("tle_folder: /tmp\nworker_timeout: soon\nsatellites: []");
        assert!(matches!(err, Err(ConfigError::WorkerTimeout(_))));
    }

    #[test]
    fn satellite_without_name_fails_to_parse() {
        let err = Config::from_str("tle_folder: /tmp\nsatellites:\n  - speed: 10\n");
        assert!(matches!(err, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn builds_validated_constellation() {
        let config = Config::from_str(CONFIG).unwrap();
        let propagator = Arc::new(StubPropagator::new());
        let constellation = config.constellation(propagator).unwrap();
        assert_eq!(constellation.satellites().len(), 2);

        let dup = Config::from_str(
            "tle_folder: /tmp\nsatellites:\n  - name: A\n  - name: A\n",
        )
        .unwrap();
        let err = dup.constellation(Arc::new(StubPropagator::new())).err().unwrap();
        assert!(matches!(
            err,
            ConfigError::Constellation(ConstellationError::InvalidDescriptor(_))
        ));
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Config::from_str("tle_folder: /tmp\nworker_timeout: 0s\nsatellites: []");
        assert!(matches!(err, Err(ConfigError::ZeroWorkerTimeout)));
    }

    #[test]
    fn relative_tle_folder_follows_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("tle")).unwrap();
        fs::write(dir.path().join("tle").join("stations.tle"), ISS_TLE).unwrap();
        let config_path = dir.path().join("constellation.yaml");
        fs::write(&config_path, CONFIG).unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.tle_folder, dir.path().join("tle"));

        let catalog = config.load_catalog().unwrap();
        assert!(catalog.get("ISS (ZARYA)").is_ok());
    }

    #[test]
    fn absolute_tle_folder_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let tle_dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("constellation.yaml");
        fs::write(
            &config_path,
            format!("tle_folder: {}\nsatellites: []\n", tle_dir.path().display()),
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.tle_folder, tle_dir.path());
        assert!(config.load_catalog().unwrap().is_empty());
    }
}
