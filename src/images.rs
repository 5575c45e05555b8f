use image::{imageops, imageops::FilterType, DynamicImage, GrayImage, Luma, Rgb, RgbImage};

use super::*;

/// Luminance weights of the red, green and blue channels
const LUMA_WEIGHTS: [f64; 3] = [0.3, 0.59, 0.11];

/// Converts one RGB pixel to its grey level
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    (f64::from(r) * LUMA_WEIGHTS[0] + f64::from(g) * LUMA_WEIGHTS[1] + f64::from(b) * LUMA_WEIGHTS[2])
        as u8
}

/// An 8-bit grey image stored row-major in an owned buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreyImage {
    width: u32,
    height: u32,
    stride: usize,
    values: Vec<u8>,
}
impl GreyImage {
    /// Wraps an existing buffer of grey levels
    pub fn from_luma(width: u32, height: u32, values: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(Error::InvalidConfig(format!(
                "grey buffer holds {} values, a {width}x{height} image needs {expected}",
                values.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride: width as usize,
            values,
        })
    }

    /// Converts an interleaved RGB buffer to grey levels
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(Error::InvalidConfig(format!(
                "rgb buffer holds {} bytes, a {width}x{height} image needs {expected}",
                rgb.len()
            )));
        }
        let values = rgb
            .chunks_exact(3)
            .map(|px| luminance(px[0], px[1], px[2]))
            .collect();
        Self::from_luma(width, height, values)
    }

    /// Converts a decoded image of any colour type
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let values = rgb.pixels().map(|p| luminance(p[0], p[1], p[2])).collect();
        Self {
            width: rgb.width(),
            height: rgb.height(),
            stride: rgb.width() as usize,
            values,
        }
    }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    pub fn size(&self) -> Size { Size::new(self.width, self.height) }

    /// Grey level at (x, y)
    pub fn value(&self, x: u32, y: u32) -> Result<u8> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfRange {
                rect: Rectangle::new(x, y, 1, 1),
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.values[x as usize + self.stride * y as usize])
    }

    /// Row `y` of the image
    fn row(&self, y: u32) -> &[u8] {
        let start = self.stride * y as usize;
        &self.values[start..start + self.width as usize]
    }

    fn to_luma_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([self.values[x as usize + self.stride * y as usize]])
        })
    }

    fn from_luma_image(img: GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            stride: width as usize,
            values: img.into_raw(),
        }
    }

    /// Copies a rectangular region of the image
    pub fn crop(&self, r: &Rectangle) -> Result<Self> {
        if !r.fits_in(self.size()) {
            return Err(Error::OutOfRange {
                rect: *r,
                width: self.width,
                height: self.height,
            });
        }
        let mut values = Vec::with_capacity(r.width as usize * r.height as usize);
        for y in r.y..r.bottom() {
            values.extend_from_slice(&self.row(y)[r.x as usize..r.right() as usize]);
        }
        Self::from_luma(r.width, r.height, values)
    }

    /// Resamples the image to the given size
    pub fn resize(&self, size: Size) -> Self {
        if size == self.size() {
            return self.clone();
        }
        let resized = imageops::resize(
            &self.to_luma_image(),
            size.width,
            size.height,
            FilterType::Triangle,
        );
        Self::from_luma_image(resized)
    }

    /// Crops a region and resizes it to the given size, producing the view a
    /// classifier trained on `size` images expects
    pub fn window(&self, r: &Rectangle, size: Size) -> Result<Self> {
        Ok(self.crop(r)?.resize(size))
    }
}

/// Summed-area table of a grey image
#[derive(Debug, Clone)]
pub struct IntegralImage {
    table: Vec<i64>,
    width: u32,
    height: u32,
}
impl IntegralImage {
    /// Creates an integral image from a grey image
    pub fn new(img: &GreyImage) -> Self {
        // Calculate each pixel of the integral image
        let w = img.width() as usize;
        let h = img.height() as usize;
        let mut table = Vec::<i64>::with_capacity(w * h);
        for y in 0..h {
            let row = img.row(y as u32);
            for x in 0..w {
                let mut sum = i64::from(row[x]);
                if y != 0 {
                    sum += table[x + w * (y - 1)];
                }
                if x != 0 {
                    sum += table[(x - 1) + w * y];
                }
                if x != 0 && y != 0 {
                    sum -= table[(x - 1) + w * (y - 1)];
                }
                table.push(sum);
            }
        }
        Self {
            table,
            width: img.width(),
            height: img.height(),
        }
    }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    pub fn size(&self) -> Size { Size::new(self.width, self.height) }

    /// Sum of grey values in the rectangle (0,0)-(x,y), both inclusive
    fn at(&self, x: u32, y: u32) -> i64 { self.table[x as usize + self.width as usize * y as usize] }

    /// Gets the sum of pixels in a rectangular region of the original image
    pub fn rect_sum(&self, r: &Rectangle) -> Result<i64> {
        if !r.fits_in(self.size()) {
            return Err(Error::OutOfRange {
                rect: *r,
                width: self.width,
                height: self.height,
            });
        }
        if r.is_empty() {
            return Ok(0);
        }

        let (x1, y1) = (r.right() - 1, r.bottom() - 1);
        let mut sum = self.at(x1, y1);
        if r.x > 0 {
            sum -= self.at(r.x - 1, y1);
        }
        if r.y > 0 {
            sum -= self.at(x1, r.y - 1);
        }
        if r.x > 0 && r.y > 0 {
            sum += self.at(r.x - 1, r.y - 1);
        }
        Ok(sum)
    }
}

/// Draws a rectangle over an image
pub fn draw_rectangle(img: &mut RgbImage, r: &Rectangle) {
    if r.is_empty() || r.x >= img.width() || r.y >= img.height() {
        return;
    }
    let pixel: Rgb<u8> = Rgb::from([0x88, 0x95, 0x8D]);
    let right = (r.right() - 1).min(img.width() - 1);
    let bottom = (r.bottom() - 1).min(img.height() - 1);
    for x in r.x..=right {
        img.put_pixel(x, r.y, pixel);
        img.put_pixel(x, bottom, pixel);
    }
    for y in r.y..=bottom {
        img.put_pixel(r.x, y, pixel);
        img.put_pixel(right, y, pixel);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn random_image(rng: &mut StdRng, width: u32, height: u32) -> GreyImage {
        let values = (0..width * height).map(|_| rng.gen::<u8>()).collect();
        GreyImage::from_luma(width, height, values).unwrap()
    }

    fn naive_sum(img: &GreyImage, r: &Rectangle) -> i64 {
        let mut sum = 0;
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                sum += i64::from(img.value(x, y).unwrap());
            }
        }
        sum
    }

    #[test]
    fn rect_sum_matches_naive_sum_on_random_rectangles() {
        let mut rng = StdRng::seed_from_u64(7);
        let img = random_image(&mut rng, 17, 11);
        let ii = IntegralImage::new(&img);
        for _ in 0..500 {
            let x = rng.gen_range(0..img.width());
            let y = rng.gen_range(0..img.height());
            let w = rng.gen_range(1..=img.width() - x);
            let h = rng.gen_range(1..=img.height() - y);
            let r = Rectangle::new(x, y, w, h);
            assert_eq!(ii.rect_sum(&r).unwrap(), naive_sum(&img, &r), "{r:?}");
        }
    }

    #[test]
    fn rect_sum_handles_edge_touching_rectangles() {
        let mut rng = StdRng::seed_from_u64(11);
        let img = random_image(&mut rng, 9, 6);
        let ii = IntegralImage::new(&img);
        for r in [
            Rectangle::new(0, 0, 9, 6),
            Rectangle::new(0, 0, 1, 1),
            Rectangle::new(0, 3, 4, 3),
            Rectangle::new(5, 0, 4, 2),
            Rectangle::new(8, 5, 1, 1),
        ] {
            assert_eq!(ii.rect_sum(&r).unwrap(), naive_sum(&img, &r), "{r:?}");
        }
    }

    #[test]
    fn rect_sum_rejects_out_of_range() {
        let img = GreyImage::from_luma(4, 4, vec![1; 16]).unwrap();
        let ii = IntegralImage::new(&img);
        assert!(matches!(
            ii.rect_sum(&Rectangle::new(2, 2, 3, 1)),
            Err(Error::OutOfRange { .. })
        ));
        assert!(img.value(4, 0).is_err());
    }

    #[test]
    fn integral_table_is_monotonic() {
        let mut rng = StdRng::seed_from_u64(3);
        let ii = IntegralImage::new(&random_image(&mut rng, 8, 8));
        for y in 0..8 {
            for x in 1..8 {
                assert!(ii.at(x, y) >= ii.at(x - 1, y));
                assert!(ii.at(y, x) >= ii.at(y, x - 1));
            }
        }
    }

    #[test]
    fn rgb_conversion_uses_luminance_weights() {
        let img = GreyImage::from_rgb(2, 1, &[255, 255, 255, 100, 0, 0]).unwrap();
        assert!(img.value(0, 0).unwrap() >= 254);
        assert_eq!(img.value(1, 0).unwrap(), 30);
    }

    #[test]
    fn crop_copies_the_requested_region() {
        let values = (0..25).collect();
        let img = GreyImage::from_luma(5, 5, values).unwrap();
        let c = img.crop(&Rectangle::new(1, 2, 2, 2)).unwrap();
        assert_eq!(c.size(), Size::square(2));
        assert_eq!(c.value(0, 0).unwrap(), 11);
        assert_eq!(c.value(1, 1).unwrap(), 17);
        assert!(img.crop(&Rectangle::new(4, 4, 2, 1)).is_err());
    }
}
