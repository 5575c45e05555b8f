use log::info;
use serde::{Deserialize, Serialize};

use super::*;

/// A strong classifier: a weighted vote of weak classifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaBoost {
    pub window_size: u32,
    pub weak_classifiers: Vec<WeakClassifier>,
}
impl AdaBoost {
    /// Creates an empty strong classifier
    pub const fn new(window_size: u32) -> Self {
        Self {
            window_size,
            weak_classifiers: Vec::new(),
        }
    }

    /// Boosts `config.rounds` weak classifiers over the training set
    pub fn train(set: &mut TrainingSet, features: &[HaarFeature], config: &TrainingConfig) -> Result<Self> {
        let window = set.window();
        if window.width != window.height {
            return Err(Error::ImageSizeMismatch {
                expected: Size::square(window.width),
                actual: window,
            });
        }

        let mut sc = Self::new(window.width);
        for round in 1..=config.rounds {
            info!("Building Weak Classifier #{round} of {}", config.rounds);
            let wc = set.boost(features, config)?;
            sc.weak_classifiers.push(wc);
        }
        Ok(sc)
    }

    /// Total voting weight; the classifier accepts a window gathering at
    /// least half of it
    pub fn total_alpha(&self) -> f64 { self.weak_classifiers.iter().map(|wc| wc.alpha()).sum() }
}

impl Classifier for AdaBoost {
    fn window_size(&self) -> u32 { self.window_size }

    fn recognize_integral(&self, ii: &IntegralImage) -> Result<bool> {
        if self.weak_classifiers.is_empty() {
            return Err(Error::Undetermined("strong classifier has no weak classifiers".to_owned()));
        }
        let mut votes = 0.0;
        let mut total = 0.0;
        for wc in &self.weak_classifiers {
            let alpha = wc.alpha();
            if wc.decide(ii)? {
                votes += alpha;
            }
            total += alpha;
        }
        Ok(votes >= 0.5 * total)
    }
}
