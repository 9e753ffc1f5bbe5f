use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Screen space grows downwards; angles are measured with "up" positive.
    pub fn flip_y(self) -> Self {
        Self::new(self.dx, -self.dy)
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, v: Vector) -> Point {
        Point::new(self.x + v.dx, self.y + v.dy)
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, other: Point) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, k: f64) -> Vector {
        Vector::new(self.dx * k, self.dy * k)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.dx, -self.dy)
    }
}

/// Axis aligned rectangle, edges included.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(origin: Point, width: f64, height: f64) -> Self {
        Self::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    pub fn square_around(center: Point, size: f64) -> Self {
        let half = size / 2.0;
        Self::new(
            center.x - half,
            center.y - half,
            center.x + half,
            center.y + half,
        )
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Half the width; buttons are drawn as circles inscribed in their rect.
    pub fn radius(&self) -> f64 {
        self.width() / 2.0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn offset(&self, v: Vector) -> Self {
        Self::new(
            self.left + v.dx,
            self.top + v.dy,
            self.right + v.dx,
            self.bottom + v.dy,
        )
    }

    pub fn inset(&self, amount: f64) -> Self {
        Self::new(
            self.left + amount,
            self.top + amount,
            self.right - amount,
            self.bottom - amount,
        )
    }
}

/// Places sub-buttons on an arc between two angles.
///
/// Angles are in degrees. Index 0 is the primary button and is never placed;
/// sub-buttons use indices `1..=sub_count`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleCalculator {
    start: f64,
    end: f64,
    sub_count: usize,
}

impl AngleCalculator {
    pub fn new(start_deg: f64, end_deg: f64, sub_count: usize) -> Self {
        Self {
            start: start_deg,
            end: end_deg,
            sub_count,
        }
    }

    pub fn sub_count(&self) -> usize {
        self.sub_count
    }

    /// Angle of sub-button `index`, in degrees.
    pub fn angle(&self, index: usize) -> f64 {
        debug_assert!(index >= 1 && index <= self.sub_count.max(1));
        if self.sub_count <= 1 {
            // a lone sub-button sits in the middle of the arc
            return (self.start + self.end) / 2.0;
        }
        let step = (self.end - self.start) / (self.sub_count - 1) as f64;
        self.start + (index - 1) as f64 * step
    }

    /// Offset of sub-button `index` from the primary center when fully expanded.
    ///
    /// `dy` follows the mathematical convention; negate it (see
    /// [`Vector::flip_y`]) before applying it in screen space.
    pub fn offset(&self, radius: f64, index: usize) -> Vector {
        let angle = self.angle(index).to_radians();
        Vector::new(radius * angle.cos(), radius * angle.sin())
    }
}

/// Distance between the primary center and each sub-button center.
pub fn expansion_radius(main_size: f64, sub_size: f64, gap: f64) -> f64 {
    main_size / 2.0 + sub_size / 2.0 + gap
}
