use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use super::*;

/// A Haar mask placed at a position of the training window and stretched by
/// an integer scale
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HaarFeature {
    pub mask: Arc<HaarMask>,
    pub start: Point,
    pub scale: HaarScale,
}
impl HaarFeature {
    pub fn new(mask: Arc<HaarMask>, start: Point, scale: HaarScale) -> Self {
        Self { mask, start, scale }
    }

    /// The white area in image coordinates
    pub fn white_area(&self) -> Rectangle { self.mask.white_area.scaled(self.start, self.scale) }

    /// The black areas in image coordinates
    pub fn black_areas(&self) -> impl Iterator<Item = Rectangle> + '_ {
        self.mask
            .black_areas
            .iter()
            .map(move |a| a.scaled(self.start, self.scale))
    }

    /// Sum of the white area minus the sums of the black areas
    pub fn evaluate(&self, ii: &IntegralImage) -> Result<i64> {
        let mut value = ii.rect_sum(&self.white_area())?;
        for area in self.black_areas() {
            value -= ii.rect_sum(&area)?;
        }
        Ok(value)
    }

    /// Lists every placement and scale of a mask that fits in an image of the
    /// given size.
    ///
    /// The result only depends on the geometry, so it is built once per
    /// training window size and reused for every boosting round.
    pub fn enumerate(mask: &Arc<HaarMask>, size: Size) -> Vec<HaarFeature> {
        let mut features = Vec::new();
        let (w, h) = (mask.width(), mask.height());
        for x in (0..size.width).take_while(|x| x + w <= size.width) {
            for y in (0..size.height).take_while(|y| y + h <= size.height) {
                let start = Point::new(x, y);
                let mut height_multiplier = 1;
                while y + h * height_multiplier <= size.height {
                    let mut width_multiplier = 1;
                    while x + w * width_multiplier <= size.width {
                        let scale = HaarScale {
                            width_multiplier,
                            height_multiplier,
                        };
                        features.push(Self::new(Arc::clone(mask), start, scale));
                        width_multiplier += 1;
                    }
                    height_multiplier += 1;
                }
            }
        }
        features
    }

    /// Collects the features of every mask, in mask order
    pub fn enumerate_all(masks: &[Arc<HaarMask>], size: Size) -> Vec<HaarFeature> {
        let mut features = Vec::new();
        for mask in masks {
            let mut available = Self::enumerate(mask, size);
            debug!(
                "Mask {} yields {} features for a {}x{} window",
                mask.name,
                available.len(),
                size.width,
                size.height
            );
            features.append(&mut available);
        }
        features
    }
}
