use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::*;

/// A Haar feature with a fitted threshold
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeakClassifier {
    pub feature: HaarFeature,
    pub threshold: Threshold,
    /// `error / (1 - error)` of the round this classifier was selected in
    pub beta: f64,
}
impl WeakClassifier {
    /// Creates a weak classifier which has not been selected yet
    pub fn new(feature: HaarFeature, threshold: Threshold) -> Self {
        Self {
            feature,
            threshold,
            beta: 0.0,
        }
    }

    /// Voting weight of the classifier
    pub fn alpha(&self) -> f64 { (1.0 / self.beta).ln() }

    /// Classifies a window as object (`true`) or background
    pub fn decide(&self, ii: &IntegralImage) -> Result<bool> {
        Ok(self.threshold.accepts(self.feature.evaluate(ii)?))
    }

    /// Sum of the weights of the windows this classifier gets wrong
    pub fn weighted_error(&self, set: &TrainingSet) -> Result<f64> {
        let mut error = 0.0;
        for o in set.objects() {
            if self.decide(&o.image)? != o.is_object {
                error += o.weight;
            }
        }
        Ok(error)
    }

    /// Converts a weighted error to beta.
    ///
    /// A perfect classifier has its error raised to `min_error` so that alpha
    /// stays finite; errors of one or more cannot be boosted.
    pub fn beta_from_error(error: f64, min_error: f64) -> Result<f64> {
        if !error.is_finite() || error >= 1.0 || error < 0.0 {
            return Err(Error::DegenerateWeakClassifier { error });
        }
        let error = error.max(min_error);
        Ok(error / (1.0 - error))
    }

    /// Fits a threshold for every feature and returns the classifier with the
    /// lowest weighted error.
    ///
    /// Features are split into chunks fitted in parallel. Equal errors are
    /// resolved in favour of the feature listed first, so the result does
    /// not depend on scheduling.
    pub fn select_best(features: &[HaarFeature], set: &TrainingSet, config: &TrainingConfig) -> Result<Self> {
        let chunk_size = config.chunk_size.max(1);
        let chunk_bests = features
            .par_chunks(chunk_size)
            .enumerate()
            .map(|(chunk, fs)| -> Result<Option<(usize, ThresholdFit)>> {
                let mut best: Option<(usize, ThresholdFit)> = None;
                for (i, f) in fs.iter().enumerate() {
                    let fit = Threshold::fit(f, set)?;
                    if best.map_or(true, |(_, b)| fit.error < b.error) {
                        best = Some((chunk * chunk_size + i, fit));
                    }
                }
                Ok(best)
            })
            .collect::<Result<Vec<_>>>()?;

        let (index, fit) = chunk_bests
            .into_iter()
            .flatten()
            .min_by(|(ia, a), (ib, b)| a.error.total_cmp(&b.error).then(ia.cmp(ib)))
            .ok_or_else(|| Error::InvalidConfig("no candidate haar features".to_owned()))?;

        let mut wc = Self::new(features[index].clone(), fit.threshold);
        wc.beta = Self::beta_from_error(fit.error, config.min_error)?;
        Ok(wc)
    }
}
