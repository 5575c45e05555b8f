use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A point in image coordinates
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}
impl Point {
    pub const fn new(x: u32, y: u32) -> Self { Self { x, y } }
}

/// Width and height of an image or a region
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}
impl Size {
    pub const fn new(width: u32, height: u32) -> Self { Self { width, height } }

    pub const fn square(side: u32) -> Self { Self::new(side, side) }
}

/// An axis-aligned rectangle given by its top left corner and its extent
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}
impl Rectangle {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last column covered by the rectangle
    pub const fn right(&self) -> u32 { self.x + self.width }

    /// One past the last row covered by the rectangle
    pub const fn bottom(&self) -> u32 { self.y + self.height }

    pub const fn is_empty(&self) -> bool { self.width == 0 || self.height == 0 }

    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Whether the rectangle lies completely inside an image of the given size
    pub const fn fits_in(&self, size: Size) -> bool {
        self.right() <= size.width && self.bottom() <= size.height
    }

    /// Moves the rectangle by the given offset
    pub const fn offset(&self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }

    /// Positions this rectangle (given in mask cells) inside a feature placed
    /// at `origin` with the given scale
    pub const fn scaled(&self, origin: Point, scale: HaarScale) -> Self {
        Self::new(
            origin.x + self.x * scale.width_multiplier,
            origin.y + self.y * scale.height_multiplier,
            self.width * scale.width_multiplier,
            self.height * scale.height_multiplier,
        )
    }
}

/// Integer stretch factors applied to a Haar mask
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HaarScale {
    pub width_multiplier: u32,
    pub height_multiplier: u32,
}
impl HaarScale {
    pub const IDENTITY: HaarScale = HaarScale {
        width_multiplier: 1,
        height_multiplier: 1,
    };

    pub fn new(width_multiplier: u32, height_multiplier: u32) -> Result<Self> {
        if width_multiplier == 0 || height_multiplier == 0 {
            return Err(Error::InvalidConfig(format!(
                "haar scale must be at least 1x1, got {width_multiplier}x{height_multiplier}"
            )));
        }
        Ok(Self {
            width_multiplier,
            height_multiplier,
        })
    }
}
