use haar_cascade::GreyImage;
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const WINDOW: u32 = 8;

/// Window with a bright left half and a dark right half, lightly noisy.
pub fn bright_left(rng: &mut StdRng) -> GreyImage {
    let mut values = Vec::with_capacity((WINDOW * WINDOW) as usize);
    for _ in 0..WINDOW {
        for x in 0..WINDOW {
            let v = if x < WINDOW / 2 { rng.gen_range(190..=210) } else { rng.gen_range(40..=60) };
            values.push(v);
        }
    }
    GreyImage::from_luma(WINDOW, WINDOW, values).unwrap()
}

/// Mid-grey noise of any size.
pub fn noise(width: u32, height: u32, rng: &mut StdRng) -> GreyImage {
    let values = (0..width * height).map(|_| rng.gen_range(60..=180)).collect();
    GreyImage::from_luma(width, height, values).unwrap()
}

/// Seeded positive and negative training windows.
pub fn training_images(num_pos: usize, num_neg: usize, seed: u64) -> (Vec<GreyImage>, Vec<GreyImage>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let positives = (0..num_pos).map(|_| bright_left(&mut rng)).collect();
    let negatives = (0..num_neg).map(|_| noise(WINDOW, WINDOW, &mut rng)).collect();
    (positives, negatives)
}

/// Copies `patch` into `img` with its top-left corner at `(x0, y0)`.
pub fn paste(img: &GreyImage, patch: &GreyImage, x0: u32, y0: u32) -> GreyImage {
    let mut values = Vec::with_capacity((img.width() * img.height()) as usize);
    for y in 0..img.height() {
        for x in 0..img.width() {
            let inside = x >= x0 && y >= y0 && x < x0 + patch.width() && y < y0 + patch.height();
            let v = if inside { patch.value(x - x0, y - y0) } else { img.value(x, y) };
            values.push(v.unwrap());
        }
    }
    GreyImage::from_luma(img.width(), img.height(), values).unwrap()
}
