//! Viola-Jones object detection.
//!
//! Haar-like rectangle features are evaluated in constant time on integral
//! images, boosted with AdaBoost into strong classifiers, chained into an
//! attentional cascade and applied to new images with a scanning window.

mod cascade;
mod classifier;
mod cluster;
mod config;
mod constants;
mod dataset;
mod error;
mod feature;
mod images;
mod mask;
mod primitives;
mod scanning_window;
pub mod storage;
mod strong_classifier;
mod threshold;
mod training;
mod weak_classifier;

pub use cascade::{Cascade, CascadeStage};
pub use classifier::{Classifier, Evaluation};
pub use cluster::{cluster_rectangles, Cluster};
pub use config::{load_config, Config, DatasetConfig, ScanConfig, TrainingConfig};
pub use constants::*;
pub use dataset::{load_images, load_masks, load_templates, Dataset};
pub use error::{Error, Result};
pub use feature::HaarFeature;
pub use images::{draw_rectangle, luminance, GreyImage, IntegralImage};
pub use mask::{HaarMask, HaarMaskTemplate};
pub use primitives::*;
pub use scanning_window::{ScanningWindow, Windows};
pub use strong_classifier::AdaBoost;
pub use threshold::{Threshold, ThresholdFit, MIN_TRAINING_OBJECTS};
pub use training::{TrainingObject, TrainingSet};
pub use weak_classifier::WeakClassifier;
