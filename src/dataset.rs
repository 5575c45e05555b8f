//! Loading of training images and mask templates from directories

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{imageops::FilterType, io::Reader as ImageReader, ImageError};
use log::{info, warn};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use super::*;

/// Files of a directory in a stable order
fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Decodes every image of a directory, resized to `size` and turned to grey.
/// Files that are not images are skipped.
pub fn load_images(dir: &Path, size: Size) -> Result<Vec<GreyImage>> {
    let mut images = Vec::new();
    for path in sorted_files(dir)? {
        let img = match ImageReader::open(&path)?.with_guessed_format()?.decode() {
            Ok(img) => img,
            Err(ImageError::Unsupported(e)) => {
                warn!("Skipping {}: {e}", path.display());
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let img = img.resize_exact(size.width, size.height, FilterType::Triangle);
        images.push(GreyImage::from_dynamic(&img));
    }
    Ok(images)
}

/// Keeps at most `cap` randomly chosen images
fn sample(images: Vec<GreyImage>, cap: Option<usize>, rng: &mut StdRng) -> Vec<GreyImage> {
    match cap {
        Some(cap) if cap < images.len() => images.choose_multiple(rng, cap).cloned().collect(),
        _ => images,
    }
}

/// Positive and negative example windows
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub positives: Vec<GreyImage>,
    pub negatives: Vec<GreyImage>,
}
impl Dataset {
    fn load(positive_dir: &Path, negative_dir: &Path, config: &Config) -> Result<Self> {
        let window = config.window();
        let mut rng = StdRng::seed_from_u64(config.dataset.seed);
        let positives = sample(load_images(positive_dir, window)?, config.dataset.max_positives, &mut rng);
        let negatives = sample(load_images(negative_dir, window)?, config.dataset.max_negatives, &mut rng);
        info!(
            "Loaded {} positive and {} negative images from {} and {}",
            positives.len(),
            negatives.len(),
            positive_dir.display(),
            negative_dir.display()
        );
        Ok(Self {
            positives,
            negatives,
        })
    }

    /// Loads the training images named by the configuration
    pub fn training(config: &Config) -> Result<Self> {
        Self::load(&config.dataset.positive_dir, &config.dataset.negative_dir, config)
    }

    /// Loads the test images named by the configuration
    pub fn test(config: &Config) -> Result<Self> {
        Self::load(&config.dataset.test_positive_dir, &config.dataset.test_negative_dir, config)
    }

    /// Turns the images into a weighted training set
    pub fn into_training_set(self, window: Size) -> Result<TrainingSet> {
        TrainingSet::new(window, self.positives, self.negatives)
    }
}

/// Reads every template of a directory; the file stem names the template.
/// Any malformed template aborts the whole load.
pub fn load_templates(dir: &Path) -> Result<Vec<HaarMaskTemplate>> {
    let mut templates = Vec::new();
    for path in sorted_files(dir)? {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content = fs::read_to_string(&path)?;
        templates.push(HaarMaskTemplate::parse(&name, &content)?);
    }
    if templates.is_empty() {
        return Err(Error::InvalidConfig(format!(
            "no mask templates found in {}",
            dir.display()
        )));
    }
    Ok(templates)
}

/// Loads the templates and extracts their mask geometry
pub fn load_masks(dir: &Path) -> Result<Vec<Arc<HaarMask>>> {
    Ok(load_templates(dir)?
        .iter()
        .map(|t| Arc::new(HaarMask::new(t)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("haar-cascade-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn templates_load_in_name_order() {
        let dir = scratch_dir("templates");
        fs::write(dir.join("b_vertical.txt"), "0\r\n1\r\n").unwrap();
        fs::write(dir.join("a_edge.txt"), "0 1\n").unwrap();
        let masks = load_masks(&dir).unwrap();
        let names: Vec<_> = masks.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["a_edge", "b_vertical"]);
        assert_eq!(masks[1].black_areas, vec![Rectangle::new(0, 1, 1, 1)]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn one_bad_template_aborts_the_load() {
        let dir = scratch_dir("bad-templates");
        fs::write(dir.join("good.txt"), "0 1").unwrap();
        fs::write(dir.join("bad.txt"), "0 1\n0").unwrap();
        assert!(matches!(load_templates(&dir), Err(Error::InvalidMaskTemplate { .. })));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn images_are_resized_and_non_images_skipped() {
        let dir = scratch_dir("images");
        image::RgbImage::from_pixel(10, 6, image::Rgb([100, 100, 100]))
            .save(dir.join("grey.png"))
            .unwrap();
        fs::write(dir.join("notes.txt"), "not an image").unwrap();
        let images = load_images(&dir, Size::square(4)).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].size(), Size::square(4));
        assert!((99..=100).contains(&images[0].value(2, 2).unwrap()));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn sampling_is_seeded() {
        let images: Vec<_> = (0..10u8).map(|v| GreyImage::from_luma(1, 1, vec![v]).unwrap()).collect();
        let pick = |seed| sample(images.clone(), Some(4), &mut StdRng::seed_from_u64(seed));
        assert_eq!(pick(3), pick(3));
        assert_eq!(pick(3).len(), 4);
        assert_eq!(sample(images.clone(), Some(20), &mut StdRng::seed_from_u64(0)).len(), 10);
    }
}
