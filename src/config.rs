use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::*;

/// Where the labelled images live
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub positive_dir: PathBuf,
    pub negative_dir: PathBuf,
    pub test_positive_dir: PathBuf,
    pub test_negative_dir: PathBuf,
    /// Randomly keep at most this many positive images
    pub max_positives: Option<usize>,
    /// Randomly keep at most this many negative images
    pub max_negatives: Option<usize>,
    pub seed: u64,
}
impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            positive_dir: PathBuf::from(OBJECT_DIR),
            negative_dir: PathBuf::from(OTHER_DIR),
            test_positive_dir: PathBuf::from(TEST_OBJECT_DIR),
            test_negative_dir: PathBuf::from(TEST_OTHER_DIR),
            max_positives: None,
            max_negatives: None,
            seed: 0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Boosting rounds of a flat AdaBoost classifier
    pub rounds: usize,
    /// Weak classifier budget shared by all stages of a cascade
    pub max_weak_classifiers: usize,
    /// A cascade stage is closed once it lets through at most this fraction
    /// of the negatives
    pub acceptable_fp_fraction: f64,
    pub stage_epsilon: f64,
    pub chunk_size: usize,
    pub min_error: f64,
}
impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            rounds: ROUNDS,
            max_weak_classifiers: MAX_WEAK_CLASSIFIERS,
            acceptable_fp_fraction: ACCEPTABLE_FP_FRACTION,
            stage_epsilon: STAGE_EPSILON,
            chunk_size: CHUNK_SIZE,
            min_error: MIN_ERROR,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    pub min_size: u32,
    pub step: u32,
    pub growth_factor: f64,
}
impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_size: SCAN_MIN_SIZE,
            step: SCAN_STEP,
            growth_factor: SCAN_GROWTH_FACTOR,
        }
    }
}
impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_size == 0 {
            return Err(Error::InvalidConfig("scan.min_size must be positive".to_owned()));
        }
        if self.step == 0 {
            return Err(Error::InvalidConfig("scan.step must be positive".to_owned()));
        }
        if !(self.growth_factor > 1.0) {
            return Err(Error::InvalidConfig(format!(
                "scan.growth_factor must be greater than 1, got {}",
                self.growth_factor
            )));
        }
        Ok(())
    }
}

/// Everything the training and detection entry points need
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window_size: u32,
    pub template_dir: PathBuf,
    pub dataset: DatasetConfig,
    pub training: TrainingConfig,
    pub scan: ScanConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            window_size: WINDOW_SIZE,
            template_dir: PathBuf::from(TEMPLATE_DIR),
            dataset: DatasetConfig::default(),
            training: TrainingConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}
impl Config {
    pub fn window(&self) -> Size { Size::square(self.window_size) }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::InvalidConfig("window_size must be positive".to_owned()));
        }
        let t = &self.training;
        if !(0.0..=1.0).contains(&t.acceptable_fp_fraction) {
            return Err(Error::InvalidConfig(format!(
                "training.acceptable_fp_fraction must lie in [0, 1], got {}",
                t.acceptable_fp_fraction
            )));
        }
        if !(0.0..1.0).contains(&t.min_error) {
            return Err(Error::InvalidConfig(format!(
                "training.min_error must lie in [0, 1), got {}",
                t.min_error
            )));
        }
        if t.chunk_size == 0 {
            return Err(Error::InvalidConfig("training.chunk_size must be positive".to_owned()));
        }
        self.scan.validate()
    }
}

/// Reads and validates a JSON configuration file
pub fn load_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "window_size": 19, "training": { "rounds": 3 } }"#).unwrap();
        assert_eq!(config.window_size, 19);
        assert_eq!(config.training.rounds, 3);
        assert_eq!(config.training.chunk_size, CHUNK_SIZE);
        assert_eq!(config.scan, ScanConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = Config::default();
        config.scan.growth_factor = 1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.training.acceptable_fp_fraction = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.window_size = 0;
        assert!(config.validate().is_err());
    }
}
