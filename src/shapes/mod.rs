pub mod bounding_box;
pub mod bounding_circle;
pub mod circle;
pub mod line_segment;
pub mod particle;
pub mod rect;

// Re-export the specific shape types
pub use bounding_box::BoundingBox;
pub use bounding_circle::BoundingCircle;
pub use circle::Circle;
pub use line_segment::LineSegment;
pub use particle::Particle;
pub use rect::Rect;

use crate::math::vec2::Vec2;

/// Axis-aligned extents every shape exposes. `y` grows downward, so `y0` is the top.
pub trait Extents {
    fn x0(&self) -> f64;
    fn x1(&self) -> f64;
    fn y0(&self) -> f64;
    fn y1(&self) -> f64;

    fn width(&self) -> f64 {
        self.x1() - self.x0()
    }

    fn height(&self) -> f64 {
        self.y1() - self.y0()
    }

    fn center(&self) -> Vec2 {
        Vec2::new(self.x0() + self.width() / 2.0, self.y0() + self.height() / 2.0)
    }

    fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x0(), self.x1(), self.y0(), self.y1())
    }
}

/// Static geometry used for overlap tests and spatial queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Point(Vec2),
    Circle(BoundingCircle),
    Box(BoundingBox),
    Line(LineSegment),
}

impl Extents for Shape {
    fn x0(&self) -> f64 {
        match self {
            Shape::Point(p) => p.x,
            Shape::Circle(c) => c.x0(),
            Shape::Box(b) => b.x0,
            Shape::Line(l) => l.x0(),
        }
    }

    fn x1(&self) -> f64 {
        match self {
            Shape::Point(p) => p.x,
            Shape::Circle(c) => c.x1(),
            Shape::Box(b) => b.x1,
            Shape::Line(l) => l.x1(),
        }
    }

    fn y0(&self) -> f64 {
        match self {
            Shape::Point(p) => p.y,
            Shape::Circle(c) => c.y0(),
            Shape::Box(b) => b.y0,
            Shape::Line(l) => l.y0(),
        }
    }

    fn y1(&self) -> f64 {
        match self {
            Shape::Point(p) => p.y,
            Shape::Circle(c) => c.y1(),
            Shape::Box(b) => b.y1,
            Shape::Line(l) => l.y1(),
        }
    }
}

impl From<BoundingBox> for Shape {
    fn from(b: BoundingBox) -> Self {
        Shape::Box(b)
    }
}

impl From<BoundingCircle> for Shape {
    fn from(c: BoundingCircle) -> Self {
        Shape::Circle(c)
    }
}

impl From<LineSegment> for Shape {
    fn from(l: LineSegment) -> Self {
        Shape::Line(l)
    }
}

impl From<Vec2> for Shape {
    fn from(p: Vec2) -> Self {
        Shape::Point(p)
    }
}

/// The moving shape a body is made of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Circle(Circle),
    Rect(Rect),
}

impl BodyShape {
    pub fn particle(&self) -> &Particle {
        match self {
            BodyShape::Circle(c) => &c.particle,
            BodyShape::Rect(r) => &r.particle,
        }
    }

    fn particle_mut(&mut self) -> &mut Particle {
        match self {
            BodyShape::Circle(c) => &mut c.particle,
            BodyShape::Rect(r) => &mut r.particle,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.particle().pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.particle().velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.particle_mut().velocity = velocity;
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.particle_mut().move_by(delta);
    }

    pub fn move_to(&mut self, pos: Vec2) {
        self.particle_mut().move_to(pos);
    }

    /// The static geometry occupied right now.
    pub fn to_shape(&self) -> Shape {
        match self {
            BodyShape::Circle(c) => Shape::Circle(c.bounding_circle()),
            BodyShape::Rect(r) => Shape::Box(r.bounding_box()),
        }
    }
}

impl Extents for BodyShape {
    fn x0(&self) -> f64 {
        match self {
            BodyShape::Circle(c) => c.x0(),
            BodyShape::Rect(r) => r.x0(),
        }
    }

    fn x1(&self) -> f64 {
        match self {
            BodyShape::Circle(c) => c.x1(),
            BodyShape::Rect(r) => r.x1(),
        }
    }

    fn y0(&self) -> f64 {
        match self {
            BodyShape::Circle(c) => c.y0(),
            BodyShape::Rect(r) => r.y0(),
        }
    }

    fn y1(&self) -> f64 {
        match self {
            BodyShape::Circle(c) => c.y1(),
            BodyShape::Rect(r) => r.y1(),
        }
    }

    fn center(&self) -> Vec2 {
        self.pos()
    }
}

impl From<Circle> for BodyShape {
    fn from(c: Circle) -> Self {
        BodyShape::Circle(c)
    }
}

impl From<Rect> for BodyShape {
    fn from(r: Rect) -> Self {
        BodyShape::Rect(r)
    }
}
