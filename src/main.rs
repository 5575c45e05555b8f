use std::path::Path;

use clap::{load_yaml, App, AppSettings, ArgMatches};
use haar_cascade::*;
use image::io::Reader as ImageReader;
use log::info;
use serde::Deserialize;

/// A trained model of either kind, told apart by its fields
#[derive(Deserialize)]
#[serde(untagged)]
enum Model {
    Cascade(Cascade),
    AdaBoost(AdaBoost),
}
impl Model {
    fn load(path: &Path) -> Result<Self> { storage::load_json(path) }

    fn classifier(&self) -> &dyn Classifier {
        match self {
            Model::Cascade(c) => c,
            Model::AdaBoost(a) => a,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse the cli arguments using clap
    let yaml = load_yaml!("cli.yml");
    let app = App::from_yaml(yaml)
        .setting(AppSettings::ArgRequiredElseHelp)
        .get_matches();

    // Run the specified subcommand
    let result = match app.subcommand() {
        ("adaboost", Some(m)) => train_adaboost(m),
        ("cascade", Some(m)) => train_cascade(m),
        ("test", Some(m)) => test(m),
        ("detect", Some(m)) => detect(m),
        _ => {
            println!("Incorrect subcommand");
            Ok(())
        }
    };
    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn config(m: &ArgMatches) -> Result<Config> {
    match m.value_of("config") {
        Some(path) => load_config(Path::new(path)),
        None => {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Required arguments are enforced by clap
fn required<'a>(m: &'a ArgMatches, name: &str) -> &'a Path { Path::new(m.value_of(name).unwrap_or_default()) }

/// Loads the training images and lists every candidate feature
fn prepare_training(config: &Config) -> Result<(TrainingSet, Vec<HaarFeature>)> {
    let window = config.window();
    let masks = load_masks(&config.template_dir)?;
    let features = HaarFeature::enumerate_all(&masks, window);
    info!(
        "Created vector of {} possible features from {} masks",
        features.len(),
        masks.len()
    );
    let set = Dataset::training(config)?.into_training_set(window)?;
    Ok((set, features))
}

/// Trains a flat strong classifier
fn train_adaboost(m: &ArgMatches) -> Result<()> {
    let config = config(m)?;
    let (mut set, features) = prepare_training(&config)?;
    let classifier = AdaBoost::train(&mut set, &features, &config.training)?;

    let output = required(m, "output");
    storage::save_json(&classifier, output)?;
    println!("Saved strong classifier to {}", output.display());
    Ok(())
}

/// Builds the cascade
fn train_cascade(m: &ArgMatches) -> Result<()> {
    let config = config(m)?;
    let (mut set, features) = prepare_training(&config)?;
    let cascade = Cascade::train(&mut set, &features, &config.training)?;

    let output = required(m, "output");
    storage::save_json(&cascade, output)?;
    println!(
        "Saved cascade of {} stages ({} weak classifiers) to {}",
        cascade.stages.len(),
        cascade.num_weak_classifiers(),
        output.display()
    );
    Ok(())
}

/// Test a trained model over the test images
fn test(m: &ArgMatches) -> Result<()> {
    let config = config(m)?;
    let model = Model::load(required(m, "model"))?;
    let dataset = Dataset::test(&config)?;
    let eval = model
        .classifier()
        .evaluate(&dataset.positives, &dataset.negatives)?;

    // Print test results
    println!("correct_objects: {}", eval.true_positives);
    println!("correct_others: {}", eval.true_negatives);
    println!("num_objects: {}", eval.positives());
    println!("images_len: {}", eval.total());
    println!(
        "Percent of correctly evaluated images: {:.2}%",
        eval.accuracy() * 100.0
    );
    println!(
        "Percent of correctly evaluated images of the object: {:.2}%",
        eval.detection_rate() * 100.0
    );
    println!(
        "Percent of correctly evaluated images which aren't the object: {:.2}%",
        (1.0 - eval.false_positive_rate()) * 100.0
    );
    Ok(())
}

/// Slides a window across the image and marks every window the model accepts
fn detect(m: &ArgMatches) -> Result<()> {
    let config = config(m)?;
    let model = Model::load(required(m, "model"))?;

    let img = ImageReader::open(required(m, "input_image"))?.decode()?;
    let grey = GreyImage::from_dynamic(&img);

    // Find all instances of the object in the image
    let mut rects = model.classifier().find_objects(&grey, &config.scan)?;
    if m.is_present("cluster") {
        rects = cluster_rectangles(&rects).iter().map(|c| c.center()).collect();
    }

    // Edit the original image to show the found instances
    let mut img = img.to_rgb8();
    for r in rects.iter() {
        draw_rectangle(&mut img, r);
    }
    let output = required(m, "output_image");
    img.save(output)?;
    println!("Marked {} detections in {}", rects.len(), output.display());

    // Output the rectangles
    if let Some(path) = m.value_of("json") {
        storage::save_json(&rects, Path::new(path))?;
    }
    Ok(())
}
