use crate::math::vec2::Vec2;

use super::Extents;

/// An axis-aligned bounding box defined by its extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl BoundingBox {
    /// Creates a new box. Swapped extents are reordered so that `x0 <= x1` and `y0 <= y1`.
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        BoundingBox {
            x0: x0.min(x1),
            x1: x0.max(x1),
            y0: y0.min(y1),
            y1: y0.max(y1),
        }
    }

    /// Box centered on `center` with the given dimensions.
    pub fn from_center(center: Vec2, width: f64, height: f64) -> Self {
        BoundingBox::new(
            center.x - width / 2.0,
            center.x + width / 2.0,
            center.y - height / 2.0,
            center.y + height / 2.0,
        )
    }

    /// The same box shifted by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        BoundingBox::new(self.x0 + delta.x, self.x1 + delta.x, self.y0 + delta.y, self.y1 + delta.y)
    }

    /// Expands this box to also contain `other`.
    pub fn merge(&mut self, other: &BoundingBox) {
        self.x0 = self.x0.min(other.x0);
        self.y0 = self.y0.min(other.y0);
        self.x1 = self.x1.max(other.x1);
        self.y1 = self.y1.max(other.y1);
    }

    /// The four equal quadrants in order: top-left, top-right, bottom-left, bottom-right
    /// (y grows downward).
    pub fn quadrants(&self) -> [BoundingBox; 4] {
        let mid_x = self.x0 + self.width() / 2.0;
        let mid_y = self.y0 + self.height() / 2.0;
        [
            BoundingBox::new(self.x0, mid_x, self.y0, mid_y),
            BoundingBox::new(mid_x, self.x1, self.y0, mid_y),
            BoundingBox::new(self.x0, mid_x, mid_y, self.y1),
            BoundingBox::new(mid_x, self.x1, mid_y, self.y1),
        ]
    }

    /// Corners in order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x0, self.y0),
            Vec2::new(self.x1, self.y0),
            Vec2::new(self.x1, self.y1),
            Vec2::new(self.x0, self.y1),
        ]
    }
}

impl Extents for BoundingBox {
    fn x0(&self) -> f64 {
        self.x0
    }

    fn x1(&self) -> f64 {
        self.x1
    }

    fn y0(&self) -> f64 {
        self.y0
    }

    fn y1(&self) -> f64 {
        self.y1
    }
}
