use log::{info, warn};

use super::*;

/// One labelled training window
#[derive(Debug, Clone)]
pub struct TrainingObject {
    pub image: IntegralImage,
    pub weight: f64,
    pub is_object: bool,
}

/// The weighted training windows boosting runs over
#[derive(Debug, Clone)]
pub struct TrainingSet {
    window: Size,
    objects: Vec<TrainingObject>,
}
impl TrainingSet {
    /// Builds the training set from positive and negative windows.
    ///
    /// Each class starts with half of the total weight, shared equally among
    /// its windows.
    pub fn new(window: Size, positives: Vec<GreyImage>, negatives: Vec<GreyImage>) -> Result<Self> {
        for (class, len) in [("positive", positives.len()), ("negative", negatives.len())] {
            if len == 0 {
                warn!("Training set has no {class} windows");
                return Err(Error::InsufficientTrainingData {
                    required: 1,
                    actual: 0,
                });
            }
        }

        let pos_weight = 1.0 / (2.0 * positives.len() as f64);
        let neg_weight = 1.0 / (2.0 * negatives.len() as f64);
        let labelled = positives
            .into_iter()
            .map(|img| (img, pos_weight, true))
            .chain(negatives.into_iter().map(|img| (img, neg_weight, false)));

        let mut objects = Vec::new();
        for (img, weight, is_object) in labelled {
            if img.size() != window {
                return Err(Error::ImageSizeMismatch {
                    expected: window,
                    actual: img.size(),
                });
            }
            objects.push(TrainingObject {
                image: IntegralImage::new(&img),
                weight,
                is_object,
            });
        }

        Ok(Self { window, objects })
    }

    pub fn window(&self) -> Size { self.window }

    pub fn objects(&self) -> &[TrainingObject] { &self.objects }

    pub fn len(&self) -> usize { self.objects.len() }

    pub fn is_empty(&self) -> bool { self.objects.is_empty() }

    pub fn positives(&self) -> impl Iterator<Item = &TrainingObject> {
        self.objects.iter().filter(|o| o.is_object)
    }

    pub fn negatives(&self) -> impl Iterator<Item = &TrainingObject> {
        self.objects.iter().filter(|o| !o.is_object)
    }

    /// Total weight of the positive and of the negative windows
    pub fn class_weights(&self) -> (f64, f64) {
        self.objects.iter().fold((0.0, 0.0), |(pos, neg), o| {
            if o.is_object {
                (pos + o.weight, neg)
            } else {
                (pos, neg + o.weight)
            }
        })
    }

    /// Normalize the weights so they sum to one
    pub fn normalize_weights(&mut self) {
        let sum: f64 = self.objects.iter().map(|o| o.weight).sum();
        for o in self.objects.iter_mut() {
            o.weight /= sum;
        }
    }

    /// Shrinks the weight of every window the classifier gets right by its
    /// beta, leaving the misclassified ones untouched
    pub fn update_weights(&mut self, wc: &WeakClassifier) -> Result<()> {
        for o in self.objects.iter_mut() {
            if wc.decide(&o.image)? == o.is_object {
                o.weight *= wc.beta;
            }
        }
        Ok(())
    }

    /// Runs one boosting round: normalizes the weights, picks the weak
    /// classifier with the lowest weighted error and reweights the set
    pub fn boost(&mut self, features: &[HaarFeature], config: &TrainingConfig) -> Result<WeakClassifier> {
        self.normalize_weights();
        let wc = WeakClassifier::select_best(features, self, config)?;
        self.update_weights(&wc)?;
        info!(
            "Selected {} at {:?} scale {}x{}: beta {:.6}, alpha {:.4}",
            wc.feature.mask.name,
            wc.feature.start,
            wc.feature.scale.width_multiplier,
            wc.feature.scale.height_multiplier,
            wc.beta,
            wc.alpha()
        );
        Ok(wc)
    }
}
