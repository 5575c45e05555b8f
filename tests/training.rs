mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::synthetic_image::{training_images, WINDOW};
use haar_cascade::*;

fn features() -> Vec<HaarFeature> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(TEMPLATE_DIR);
    let masks: Vec<Arc<HaarMask>> = load_masks(&dir).unwrap();
    HaarFeature::enumerate_all(&masks, Size::square(WINDOW))
}

fn config(rounds: usize) -> TrainingConfig {
    TrainingConfig {
        rounds,
        max_weak_classifiers: rounds,
        chunk_size: 97,
        ..TrainingConfig::default()
    }
}

fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("haar-cascade-it-{name}-{}.json", std::process::id()))
}

#[test]
fn adaboost_separates_its_training_set() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (positives, negatives) = training_images(10, 20, 7);
    let mut set = TrainingSet::new(Size::square(WINDOW), positives.clone(), negatives.clone()).unwrap();
    let classifier = AdaBoost::train(&mut set, &features(), &config(3)).unwrap();

    assert_eq!(classifier.weak_classifiers.len(), 3);
    assert!(classifier.weak_classifiers.iter().all(|wc| wc.alpha() > 0.0));
    let eval = classifier.evaluate(&positives, &negatives).unwrap();
    assert_eq!(eval.true_positives, 10);
    assert_eq!(eval.true_negatives, 20);
    assert!((eval.accuracy() - 1.0).abs() < 1e-12);
}

#[test]
fn cascade_closes_a_stage_per_separating_classifier() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (positives, negatives) = training_images(10, 20, 11);
    let mut set = TrainingSet::new(Size::square(WINDOW), positives.clone(), negatives.clone()).unwrap();
    let cascade = Cascade::train(&mut set, &features(), &config(3)).unwrap();

    assert_eq!(cascade.stages.len(), 3);
    assert_eq!(cascade.num_weak_classifiers(), 3);
    for img in &positives {
        let ii = IntegralImage::new(img);
        assert_eq!(cascade.stage_results(&ii).unwrap(), vec![true; 3]);
    }
    for img in &negatives {
        let ii = IntegralImage::new(img);
        assert_eq!(cascade.stage_results(&ii).unwrap(), vec![false]);
    }
}

#[test]
fn saved_models_classify_identically_after_reload() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (positives, negatives) = training_images(8, 12, 3);
    let window = Size::square(WINDOW);
    let features = features();

    let mut set = TrainingSet::new(window, positives.clone(), negatives.clone()).unwrap();
    let adaboost = AdaBoost::train(&mut set, &features, &config(2)).unwrap();
    let mut set = TrainingSet::new(window, positives.clone(), negatives.clone()).unwrap();
    let cascade = Cascade::train(&mut set, &features, &config(2)).unwrap();

    let adaboost_path = scratch_file("adaboost");
    storage::save_json(&adaboost, &adaboost_path).unwrap();
    let reloaded: AdaBoost = storage::load_json(&adaboost_path).unwrap();
    assert_eq!(reloaded, adaboost);

    let cascade_path = scratch_file("cascade");
    storage::save_json(&cascade, &cascade_path).unwrap();
    let reloaded_cascade: Cascade = storage::load_json(&cascade_path).unwrap();
    assert_eq!(reloaded_cascade, cascade);

    let (unseen_pos, unseen_neg) = training_images(5, 5, 99);
    for img in positives.iter().chain(&negatives).chain(&unseen_pos).chain(&unseen_neg) {
        assert_eq!(reloaded.recognize(img).unwrap(), adaboost.recognize(img).unwrap());
        assert_eq!(
            reloaded_cascade.recognize(img).unwrap(),
            cascade.recognize(img).unwrap()
        );
    }

    std::fs::remove_file(adaboost_path).unwrap();
    std::fs::remove_file(cascade_path).unwrap();
}

#[test]
fn training_needs_both_classes() {
    let (positives, _) = training_images(4, 0, 1);
    assert!(matches!(
        TrainingSet::new(Size::square(WINDOW), positives, Vec::new()),
        Err(Error::InsufficientTrainingData { .. })
    ));
}
