use log::info;
use serde::{Deserialize, Serialize};

use crate::*;

/// One layer of the cascade
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CascadeStage {
    pub weak_classifiers: Vec<WeakClassifier>,
    pub threshold: f64,
}
impl CascadeStage {
    /// Stage accepting windows that gather at least half of its voting weight
    pub fn with_default_threshold(weak_classifiers: Vec<WeakClassifier>) -> Self {
        let threshold = 0.5 * weak_classifiers.iter().map(|wc| wc.alpha()).sum::<f64>();
        Self {
            weak_classifiers,
            threshold,
        }
    }

    /// Sum of the alphas of the classifiers accepting the window
    pub fn activation(&self, ii: &IntegralImage) -> Result<f64> {
        let mut activation = 0.0;
        for wc in &self.weak_classifiers {
            if wc.decide(ii)? {
                activation += wc.alpha();
            }
        }
        Ok(activation)
    }

    pub fn passes(&self, ii: &IntegralImage) -> Result<bool> { Ok(self.activation(ii)? >= self.threshold) }
}

/// Running activations of the training windows in the stage being built
struct StageActivations {
    positives: Vec<f64>,
    negatives: Vec<f64>,
}
impl StageActivations {
    fn new(num_pos: usize, num_neg: usize) -> Self {
        Self {
            positives: vec![0.0; num_pos],
            negatives: vec![0.0; num_neg],
        }
    }

    fn add(&mut self, wc: &WeakClassifier, set: &TrainingSet) -> Result<()> {
        let alpha = wc.alpha();
        for (act, o) in self.positives.iter_mut().zip(set.positives()) {
            if wc.decide(&o.image)? {
                *act += alpha;
            }
        }
        for (act, o) in self.negatives.iter_mut().zip(set.negatives()) {
            if wc.decide(&o.image)? {
                *act += alpha;
            }
        }
        Ok(())
    }

    /// Threshold just below the weakest positive, so every training positive
    /// passes the stage
    fn threshold(&self, epsilon: f64) -> f64 {
        self.positives.iter().copied().fold(f64::INFINITY, f64::min) - epsilon
    }

    fn false_positives(&self, threshold: f64) -> usize {
        self.negatives.iter().filter(|&&a| a >= threshold).count()
    }
}

/// An attentional cascade of boosted stages
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cascade {
    pub window_size: u32,
    pub stages: Vec<CascadeStage>,
}
impl Cascade {
    pub const fn new(window_size: u32) -> Self {
        Self {
            window_size,
            stages: Vec::new(),
        }
    }

    /// Builds the cascade from the training set.
    ///
    /// Weak classifiers are boosted one at a time into the current stage.
    /// After each one the stage threshold is placed just under the weakest
    /// positive activation; once that threshold lets through at most
    /// `acceptable_fp_fraction` of the negatives the stage is closed and a
    /// new one begins. Training stops when `max_weak_classifiers` have been
    /// boosted; an unfinished last stage falls back to the default
    /// half-of-alpha threshold.
    pub fn train(set: &mut TrainingSet, features: &[HaarFeature], config: &TrainingConfig) -> Result<Self> {
        let window = set.window();
        if window.width != window.height {
            return Err(Error::ImageSizeMismatch {
                expected: Size::square(window.width),
                actual: window,
            });
        }
        if config.max_weak_classifiers == 0 {
            return Err(Error::InvalidConfig(
                "training.max_weak_classifiers must be positive".to_owned(),
            ));
        }

        let num_pos = set.positives().count();
        let num_neg = set.negatives().count();
        let acceptable_fp = config.acceptable_fp_fraction * num_neg as f64;

        let mut cascade = Self::new(window.width);
        let mut current = Vec::<WeakClassifier>::new();
        let mut activations = StageActivations::new(num_pos, num_neg);

        for total in 1..=config.max_weak_classifiers {
            info!(
                "Building Weak Classifier #{} of Stage #{}",
                current.len() + 1,
                cascade.stages.len() + 1
            );
            let wc = set.boost(features, config)?;
            activations.add(&wc, set)?;
            current.push(wc);

            let threshold = activations.threshold(config.stage_epsilon);
            let false_positives = activations.false_positives(threshold);
            info!("Stage threshold {threshold:.6} lets through {false_positives} of {num_neg} negatives");

            if false_positives as f64 <= acceptable_fp {
                info!(
                    "Closing Stage #{} with {} weak classifiers",
                    cascade.stages.len() + 1,
                    current.len()
                );
                cascade.stages.push(CascadeStage {
                    weak_classifiers: std::mem::take(&mut current),
                    threshold,
                });
                activations = StageActivations::new(num_pos, num_neg);
            } else if total == config.max_weak_classifiers {
                info!(
                    "Budget exhausted, closing Stage #{} with the default threshold",
                    cascade.stages.len() + 1
                );
                cascade
                    .stages
                    .push(CascadeStage::with_default_threshold(std::mem::take(&mut current)));
            }
        }

        Ok(cascade)
    }

    /// Passes the window through the stages in order, reporting each result
    /// up to and including the first rejection
    pub fn stage_results(&self, ii: &IntegralImage) -> Result<Vec<bool>> {
        let mut results = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let passed = stage.passes(ii)?;
            results.push(passed);
            if !passed {
                break;
            }
        }
        Ok(results)
    }

    pub fn num_weak_classifiers(&self) -> usize { self.stages.iter().map(|s| s.weak_classifiers.len()).sum() }
}

impl Classifier for Cascade {
    fn window_size(&self) -> u32 { self.window_size }

    fn recognize_integral(&self, ii: &IntegralImage) -> Result<bool> {
        if self.stages.is_empty() {
            return Err(Error::Undetermined("cascade has no stages".to_owned()));
        }
        for stage in &self.stages {
            if !stage.passes(ii)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
