use super::*;

/// Square search windows over an image, growing geometrically in size
#[derive(Debug, Clone, PartialEq)]
pub struct ScanningWindow {
    image: Size,
    min_size: u32,
    step: u32,
    growth_factor: f64,
}
impl ScanningWindow {
    pub fn new(image: Size, config: &ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            image,
            min_size: config.min_size,
            step: config.step,
            growth_factor: config.growth_factor,
        })
    }

    /// Window sizes in scanning order.
    ///
    /// Each size is the previous one times the growth factor, rounded down
    /// but always at least one pixel larger.
    pub fn sizes(&self) -> impl Iterator<Item = u32> {
        let max = self.image.width.min(self.image.height);
        let factor = self.growth_factor;
        std::iter::successors(Some(self.min_size), move |&s| {
            Some(((f64::from(s) * factor).floor() as u32).max(s + 1))
        })
        .take_while(move |&s| s <= max)
    }

    /// Every window of every size; for one size rows are scanned top to
    /// bottom, each row left to right
    pub fn windows(&self) -> Windows<'_> {
        Windows {
            scan: self,
            sizes: Box::new(self.sizes()),
            size: 0,
            x: 0,
            y: 0,
            done: true,
        }
    }
}

/// Lazy iterator over the windows of a [`ScanningWindow`]
pub struct Windows<'a> {
    scan: &'a ScanningWindow,
    sizes: Box<dyn Iterator<Item = u32> + 'a>,
    size: u32,
    x: u32,
    y: u32,
    /// Whether the current size has been exhausted
    done: bool,
}

impl<'a> Iterator for Windows<'a> {
    type Item = Rectangle;

    fn next(&mut self) -> Option<Self::Item> {
        let image = self.scan.image;
        if self.done {
            self.size = self.sizes.next()?;
            self.x = 0;
            self.y = 0;
            self.done = false;
        }

        let r = Rectangle::new(self.x, self.y, self.size, self.size);
        self.x += self.scan.step;
        if self.x + self.size > image.width {
            self.x = 0;
            self.y += self.scan.step;
            if self.y + self.size > image.height {
                self.done = true;
            }
        }
        Some(r)
    }
}

impl<'a> IntoIterator for &'a ScanningWindow {
    type Item = Rectangle;
    type IntoIter = Windows<'a>;

    fn into_iter(self) -> Self::IntoIter { self.windows() }
}
