use log::info;
use rayon::prelude::*;
use serde::Serialize;

use super::*;

/// Outcome of running a classifier over labelled test images
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluation {
    pub true_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
}
impl Evaluation {
    pub fn positives(&self) -> usize { self.true_positives + self.false_negatives }

    pub fn negatives(&self) -> usize { self.true_negatives + self.false_positives }

    pub fn total(&self) -> usize { self.positives() + self.negatives() }

    /// Fraction of all images classified correctly
    pub fn accuracy(&self) -> f64 { ratio(self.true_positives + self.true_negatives, self.total()) }

    /// Fraction of object images that were detected
    pub fn detection_rate(&self) -> f64 { ratio(self.true_positives, self.positives()) }

    /// Fraction of background images mistaken for the object
    pub fn false_positive_rate(&self) -> f64 { ratio(self.false_positives, self.negatives()) }
}

fn ratio(n: usize, d: usize) -> f64 {
    if d == 0 {
        0.0
    } else {
        n as f64 / d as f64
    }
}

/// A trained binary object/background classifier over square windows
pub trait Classifier: Sync {
    /// Side of the square windows the classifier was trained on
    fn window_size(&self) -> u32;

    /// Classifies the integral image of a window of `window_size`
    fn recognize_integral(&self, ii: &IntegralImage) -> Result<bool>;

    /// Classifies an image of any size by resampling it to the training
    /// window
    fn recognize(&self, img: &GreyImage) -> Result<bool> {
        let window = Size::square(self.window_size());
        if img.size() == window {
            self.recognize_integral(&IntegralImage::new(img))
        } else {
            self.recognize_integral(&IntegralImage::new(&img.resize(window)))
        }
    }

    /// Detects all instances of the object in an image.
    ///
    /// Every scanning window is cropped, resampled and classified on its own;
    /// accepted windows are returned in scanning order.
    fn find_objects(&self, img: &GreyImage, scan: &ScanConfig) -> Result<Vec<Rectangle>> {
        let window = Size::square(self.window_size());
        let candidates: Vec<Rectangle> = ScanningWindow::new(img.size(), scan)?.windows().collect();
        let accepted = candidates
            .par_iter()
            .map(|r| -> Result<Option<Rectangle>> {
                let view = img.window(r, window)?;
                Ok(self.recognize_integral(&IntegralImage::new(&view))?.then_some(*r))
            })
            .collect::<Result<Vec<_>>>()?;
        let objects: Vec<Rectangle> = accepted.into_iter().flatten().collect();
        info!(
            "Scanned {} windows of a {}x{} image, {} accepted",
            candidates.len(),
            img.width(),
            img.height(),
            objects.len()
        );
        Ok(objects)
    }

    /// Tests the classifier over labelled images
    fn evaluate(&self, positives: &[GreyImage], negatives: &[GreyImage]) -> Result<Evaluation> {
        let count = |images: &[GreyImage]| -> Result<usize> {
            let results = images
                .par_iter()
                .map(|img| self.recognize(img))
                .collect::<Result<Vec<bool>>>()?;
            Ok(results.into_iter().filter(|&r| r).count())
        };
        let detected = count(positives)?;
        let false_alarms = count(negatives)?;
        Ok(Evaluation {
            true_positives: detected,
            false_negatives: positives.len() - detected,
            true_negatives: negatives.len() - false_alarms,
            false_positives: false_alarms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts windows whose mean grey level is above a limit
    struct Bright(i64);

    impl Classifier for Bright {
        fn window_size(&self) -> u32 { 4 }

        fn recognize_integral(&self, ii: &IntegralImage) -> Result<bool> {
            let sum = ii.rect_sum(&Rectangle::new(0, 0, ii.width(), ii.height()))?;
            Ok(sum / i64::from(ii.width() * ii.height()) > self.0)
        }
    }

    #[test]
    fn find_objects_returns_accepted_windows_in_scan_order() {
        let mut values = vec![0u8; 16 * 8];
        for y in 0..4 {
            for x in 8..12 {
                values[x + 16 * y] = 250;
            }
        }
        let img = GreyImage::from_luma(16, 8, values).unwrap();
        let scan = ScanConfig {
            min_size: 4,
            step: 4,
            growth_factor: 2.0,
        };
        let found = Bright(200).find_objects(&img, &scan).unwrap();
        assert_eq!(found, vec![Rectangle::new(8, 0, 4, 4)]);
    }

    #[test]
    fn evaluation_counts_each_outcome() {
        let flat = |v: u8, side: u32| GreyImage::from_luma(side, side, vec![v; (side * side) as usize]).unwrap();
        let positives = [flat(255, 4), flat(240, 8), flat(10, 4)];
        let negatives = [flat(0, 4), flat(230, 2)];
        let eval = Bright(200).evaluate(&positives, &negatives).unwrap();
        assert_eq!(
            eval,
            Evaluation {
                true_positives: 2,
                false_negatives: 1,
                true_negatives: 1,
                false_positives: 1,
            }
        );
        assert!((eval.accuracy() - 0.6).abs() < 1e-12);
        assert!((eval.detection_rate() - 2.0 / 3.0).abs() < 1e-12);
        assert!((eval.false_positive_rate() - 0.5).abs() < 1e-12);
    }
}
