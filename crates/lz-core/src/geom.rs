use core::ops::{Add, Mul, Sub};

/// A vertex on the pixel-corner lattice. Pixel `(x, y)` spans
/// `[x, x + 1] x [y, y + 1]`, with `y` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2f {
    pub x: f32,
    pub y: f32,
}

impl Point2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Z component of the 3D cross product.
    pub fn cross(self, rhs: Self) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    pub fn norm(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl Add<Vec2f> for Point2f {
    type Output = Point2f;

    fn add(self, rhs: Vec2f) -> Self::Output {
        Point2f {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub<Point2f> for Point2f {
    type Output = Vec2f;

    fn sub(self, rhs: Point2f) -> Self::Output {
        Vec2f {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2f {
    type Output = Vec2f;

    fn mul(self, rhs: f32) -> Self::Output {
        Vec2f {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Shoelace signed area of a closed polygon.
///
/// Loops produced by boundary tracing around filled pixels are positive;
/// loops around holes are negative.
pub fn signed_area(points: &[Point2f]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut twice = 0.0_f64;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        twice += f64::from(a.x) * f64::from(b.y) - f64::from(b.x) * f64::from(a.y);
    }

    twice * 0.5
}

/// Length of a closed polygon, including the closing edge.
pub fn perimeter(points: &[Point2f]) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }

    let mut len = 0.0_f32;
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        len += (b - a).norm();
    }

    len
}
