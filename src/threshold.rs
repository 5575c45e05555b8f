use serde::{Deserialize, Serialize};

use super::*;

/// Smallest training set a threshold can be fitted on
pub const MIN_TRAINING_OBJECTS: usize = 3;

/// Decision boundary of a weak classifier.
///
/// With `sign == 1` feature values below `value` are classified as the
/// object; with `sign == -1` values above it are.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub sign: i8,
    pub value: f64,
}

/// A fitted threshold together with its weighted training error
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdFit {
    pub threshold: Threshold,
    pub error: f64,
}

impl Threshold {
    pub const fn new(sign: i8, value: f64) -> Self { Self { sign, value } }

    /// Whether a feature value falls on the object side of the boundary
    pub fn accepts(&self, feature_value: i64) -> bool {
        let sign = f64::from(self.sign);
        sign * (feature_value as f64) < sign * self.value
    }

    /// Finds the threshold and sign minimizing the weighted error of a
    /// feature over the training set.
    ///
    /// Objects are sorted by feature value and every midpoint between two
    /// distinct neighbouring values is tried with both signs. Ties go to the
    /// first candidate found, i.e. the lowest threshold, `+1` before `-1`.
    pub fn fit(feature: &HaarFeature, set: &TrainingSet) -> Result<ThresholdFit> {
        let objects = set.objects();
        if objects.len() < MIN_TRAINING_OBJECTS {
            return Err(Error::InsufficientTrainingData {
                required: MIN_TRAINING_OBJECTS,
                actual: objects.len(),
            });
        }

        let mut pairs = objects
            .iter()
            .map(|obj| Ok((feature.evaluate(&obj.image)?, obj)))
            .collect::<Result<Vec<_>>>()?;
        pairs.sort_by_key(|(value, _)| *value);

        let (total_pos, total_neg) = set.class_weights();
        let (mut pos_below, mut neg_below) = (0.0, 0.0);
        let mut best: Option<ThresholdFit> = None;

        for window in pairs.windows(2) {
            let (prev_value, prev) = window[0];
            let (value, _) = window[1];

            if prev.is_object {
                pos_below += prev.weight;
            } else {
                neg_below += prev.weight;
            }
            if prev_value == value {
                continue;
            }

            let midpoint = (prev_value as f64 + value as f64) / 2.0;
            let candidates = [
                (1, neg_below + (total_pos - pos_below)),
                (-1, pos_below + (total_neg - neg_below)),
            ];
            for (sign, error) in candidates {
                // Prefix sums may drift slightly below zero
                let error = error.max(0.0);
                if best.map_or(true, |b| error < b.error) {
                    best = Some(ThresholdFit {
                        threshold: Threshold::new(sign, midpoint),
                        error,
                    });
                }
            }
        }

        // Every object has the same value: classify them all as background
        Ok(best.unwrap_or(ThresholdFit {
            threshold: Threshold::new(1, pairs[0].0 as f64),
            error: total_pos,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    /// A 2x1 edge feature over 2x1 images: the value is the left pixel
    fn left_pixel_feature() -> HaarFeature {
        let mask = HaarMask::new(&HaarMaskTemplate::parse("edge", "0 1").unwrap());
        HaarFeature::new(Arc::new(mask), Point::new(0, 0), HaarScale::IDENTITY)
    }

    fn set(samples: &[(u8, bool)]) -> TrainingSet {
        let image = |v: u8| GreyImage::from_luma(2, 1, vec![v, 0]).unwrap();
        let positives = samples.iter().filter(|s| s.1).map(|s| image(s.0)).collect();
        let negatives = samples.iter().filter(|s| !s.1).map(|s| image(s.0)).collect();
        TrainingSet::new(Size::new(2, 1), positives, negatives).unwrap()
    }

    #[test]
    fn separable_set_has_zero_error() {
        let set = set(&[(200, true), (220, true), (10, false), (30, false)]);
        let fit = Threshold::fit(&left_pixel_feature(), &set).unwrap();
        assert_eq!(fit.error, 0.0);
        assert_eq!(fit.threshold.sign, -1);
        assert!(fit.threshold.value > 30.0 && fit.threshold.value < 200.0);
        assert_eq!(fit.threshold.value, 115.0);
    }

    #[test]
    fn low_valued_positives_use_positive_sign() {
        let set = set(&[(5, true), (6, true), (100, false), (120, false)]);
        let fit = Threshold::fit(&left_pixel_feature(), &set).unwrap();
        assert_eq!(fit.error, 0.0);
        assert_eq!(fit.threshold, Threshold::new(1, 53.0));
        assert!(fit.threshold.accepts(5));
        assert!(!fit.threshold.accepts(100));
    }

    #[test]
    fn fitted_error_matches_weighted_error() {
        let set = set(&[(10, true), (50, false), (60, true), (90, false), (95, true)]);
        let feature = left_pixel_feature();
        let fit = Threshold::fit(&feature, &set).unwrap();
        let wc = WeakClassifier::new(feature, fit.threshold);
        let error = wc.weighted_error(&set).unwrap();
        assert!((error - fit.error).abs() < 1e-12);
    }

    #[test]
    fn equal_values_fall_back_to_rejecting_everything() {
        let set = set(&[(7, true), (7, false), (7, false)]);
        let fit = Threshold::fit(&left_pixel_feature(), &set).unwrap();
        assert!(!fit.threshold.accepts(7));
        assert!((fit.error - 0.5).abs() < 1e-12);
    }

    #[test]
    fn too_few_objects_is_an_error() {
        let set = set(&[(1, true), (2, false)]);
        assert!(matches!(
            Threshold::fit(&left_pixel_feature(), &set),
            Err(Error::InsufficientTrainingData { required: 3, actual: 2 })
        ));
    }
}
