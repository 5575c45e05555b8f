//! Default values of the configuration

/// Side of the square training window
pub const WINDOW_SIZE: u32 = 24;

// DEFAULT PATHS/DIRECTORIES
/// Directory holding the haar mask templates
pub const TEMPLATE_DIR: &str = "templates";

/// Path to images of the object
pub const OBJECT_DIR: &str = "images/training/object";

/// Path to images that are not of object
pub const OTHER_DIR: &str = "images/training/other";

/// Path to test images of the object
pub const TEST_OBJECT_DIR: &str = "images/test/object";

/// Path to test images that are not of object
pub const TEST_OTHER_DIR: &str = "images/test/other";

// CONSTANTS USED IN TRAINING
/// Number of boosting rounds of a flat AdaBoost classifier
pub const ROUNDS: usize = 10;

/// Total number of weak classifiers across all stages of a cascade
pub const MAX_WEAK_CLASSIFIERS: usize = 20;

/// Maximum acceptable false positive fraction per stage
pub const ACCEPTABLE_FP_FRACTION: f64 = 0.5;

/// Margin subtracted from the weakest positive activation of a stage
pub const STAGE_EPSILON: f64 = 1e-9;

/// Number of features fitted by one parallel task
pub const CHUNK_SIZE: usize = 1000;

/// Weighted error assigned to a weak classifier that makes no mistakes
pub const MIN_ERROR: f64 = 1e-10;

// CONSTANTS USED IN DETECTION
/// Side of the smallest scanning window
pub const SCAN_MIN_SIZE: u32 = 24;

/// Distance in pixels between neighbouring scanning windows
pub const SCAN_STEP: u32 = 4;

/// Ratio between successive scanning window sizes
pub const SCAN_GROWTH_FACTOR: f64 = 1.25;
