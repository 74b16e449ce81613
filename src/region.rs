use serde::{Deserialize, Serialize};

/// Width of the logical canvas every region is stored in
pub const LOGICAL_WIDTH: f64 = 600.0;
/// Height of the logical canvas every region is stored in
pub const LOGICAL_HEIGHT: f64 = 400.0;

/// A position, either in display units or in logical units depending on context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp into the logical canvas
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, LOGICAL_WIDTH),
            y: self.y.clamp(0.0, LOGICAL_HEIGHT),
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

/// Where an image is currently drawn, in display units (pixels, terminal cells, ...)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl RenderedBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Map a display position into the logical canvas.
    ///
    /// Returns `None` for a collapsed box, where no meaningful scale exists.
    pub fn normalize(&self, pointer: Point) -> Option<Point> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Point {
            x: (pointer.x - self.left) * (LOGICAL_WIDTH / self.width),
            y: (pointer.y - self.top) * (LOGICAL_HEIGHT / self.height),
        })
    }

    pub fn contains(&self, pointer: Point) -> bool {
        pointer.x >= self.left
            && pointer.x <= self.left + self.width
            && pointer.y >= self.top
            && pointer.y <= self.top + self.height
    }
}

/// One difference between the two images, stored in logical units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A region expressed as percentages of the rendered image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Closed-interval hit test; points on the border count.
    pub fn contains(&self, p: Point) -> bool {
        let (x, y) = (self.x as f64, self.y as f64);
        p.x >= x
            && p.x <= x + self.width as f64
            && p.y >= y
            && p.y <= y + self.height as f64
    }

    /// Whether the region stays inside the logical canvas
    pub fn in_bounds(&self) -> bool {
        self.x as f64 + self.width as f64 <= LOGICAL_WIDTH
            && self.y as f64 + self.height as f64 <= LOGICAL_HEIGHT
    }

    pub fn percent_rect(&self) -> PercentRect {
        PercentRect::from_logical(
            self.x as f64,
            self.y as f64,
            self.width as f64,
            self.height as f64,
        )
    }
}

impl PercentRect {
    pub fn from_logical(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            left: x / LOGICAL_WIDTH * 100.0,
            top: y / LOGICAL_HEIGHT * 100.0,
            width: width / LOGICAL_WIDTH * 100.0,
            height: height / LOGICAL_HEIGHT * 100.0,
        }
    }

    /// Place the rectangle back onto a rendered box, in display units
    pub fn project(&self, rendered: &RenderedBox) -> RenderedBox {
        RenderedBox {
            left: rendered.left + self.left / 100.0 * rendered.width,
            top: rendered.top + self.top / 100.0 * rendered.height,
            width: self.width / 100.0 * rendered.width,
            height: self.height / 100.0 * rendered.height,
        }
    }
}
