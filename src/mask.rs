use serde::{Deserialize, Serialize};

use super::*;

/// A Haar mask template: a grid of white (0) and black (1) cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaarMaskTemplate {
    name: String,
    width: u32,
    height: u32,
    cells: Vec<u8>,
}
impl HaarMaskTemplate {
    /// Parses a template from text: one row per line, cells separated by
    /// whitespace
    pub fn parse(name: &str, content: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidMaskTemplate {
            name: name.to_owned(),
            reason,
        };

        let mut cells = Vec::new();
        let mut width = 0;
        let mut height = 0;
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            let mut row_width = 0;
            for item in line.split_whitespace() {
                let cell = match item {
                    "0" => 0,
                    "1" => 1,
                    other => return Err(invalid(format!("unexpected cell `{other}`"))),
                };
                cells.push(cell);
                row_width += 1;
            }
            if height == 0 {
                width = row_width;
            } else if row_width != width {
                return Err(invalid(format!(
                    "row {height} has {row_width} cells, expected {width}"
                )));
            }
            height += 1;
        }

        if height == 0 {
            return Err(invalid("template is empty".to_owned()));
        }
        if !cells.contains(&1) {
            return Err(invalid("template has no black cells".to_owned()));
        }

        Ok(Self {
            name: name.to_owned(),
            width,
            height,
            cells,
        })
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    /// Whether the cell at (x, y) is black
    fn is_black(&self, x: u32, y: u32) -> bool {
        self.cells[x as usize + self.width as usize * y as usize] == 1
    }

    /// Finds the black rectangles of the template.
    ///
    /// Cells are scanned row by row; an uncovered black cell starts a new
    /// area which is grown to the right along its row, then downwards while
    /// the whole span stays black and neither neighbouring column is black
    /// on that row (a black neighbour belongs to a different block).
    fn black_areas(&self) -> Vec<Rectangle> {
        let mut areas = Vec::<Rectangle>::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Point::new(x, y);
                if self.is_black(x, y) && !areas.iter().any(|a| a.contains(p)) {
                    areas.push(self.grow_area(p));
                }
            }
        }
        areas
    }

    fn grow_area(&self, start: Point) -> Rectangle {
        let width = (start.x..self.width)
            .take_while(|&x| self.is_black(x, start.y))
            .count() as u32;

        let mut height = 1;
        for y in start.y + 1..self.height {
            let span_black = (start.x..start.x + width).all(|x| self.is_black(x, y));
            if !span_black {
                break;
            }
            let left_black = start.x > 0 && self.is_black(start.x - 1, y);
            let right_black = start.x + width < self.width && self.is_black(start.x + width, y);
            if left_black || right_black {
                break;
            }
            height += 1;
        }

        Rectangle::new(start.x, start.y, width, height)
    }
}

/// Geometry of a Haar mask: the whole extent counts as white, the black
/// rectangles are subtracted from it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HaarMask {
    pub name: String,
    pub white_area: Rectangle,
    pub black_areas: Vec<Rectangle>,
}
impl HaarMask {
    pub fn new(template: &HaarMaskTemplate) -> Self {
        Self {
            name: template.name.clone(),
            white_area: Rectangle::new(0, 0, template.width, template.height),
            black_areas: template.black_areas(),
        }
    }

    pub fn width(&self) -> u32 { self.white_area.width }

    pub fn height(&self) -> u32 { self.white_area.height }

    /// Renders the mask as a template grid, one row per line
    pub fn render(&self) -> String {
        (0..self.height())
            .map(|y| {
                (0..self.width())
                    .map(|x| {
                        let black = self.black_areas.iter().any(|a| a.contains(Point::new(x, y)));
                        if black { "1" } else { "0" }
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
