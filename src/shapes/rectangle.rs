use crate::core::common::Float;
use crate::core::geometry::ray::Ray;
use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::normal::Normal3f;
use crate::core::shape::{Shape, ShapeHit};

/// Rectangle spanned by the orthogonal edges `e1` and `e2` from `corner`. The normal is
/// `e1 x e2`, so edge order picks the emitting side of area lights.
#[derive(Debug, Copy, Clone)]
pub struct Rectangle {
    pub corner  : Point3f,
    pub e1      : Vector3f,
    pub e2      : Vector3f,
    n           : Normal3f,
    area        : Float
}

impl Rectangle {
    pub fn new(corner: Point3f, e1: Vector3f, e2: Vector3f) -> Self {
        let c = e1.cross(&e2);
        let area = c.length();

        Self { corner, e1, e2, n: Normal3f::from(c / area), area }
    }

    pub fn normal(&self) -> Normal3f { self.n }
}

impl Shape for Rectangle {
    fn intersect(&self, r: &Ray) -> Option<ShapeHit> {
        let denom = r.d.dot_norm(&self.n);
        if denom.abs() < 1e-8 { return None; }

        let t = (self.corner - r.o).dot_norm(&self.n) / denom;
        if !(t > r.t_min && t < r.t_max) { return None; }

        let p = r.find_point(t);
        let rel = p - self.corner;
        let a = rel.dot(&self.e1) / self.e1.length_squared();
        let b = rel.dot(&self.e2) / self.e2.length_squared();

        if !(0.0..=1.0).contains(&a) || !(0.0..=1.0).contains(&b) { return None; }

        Some(ShapeHit { t, p, n: self.n })
    }

    fn area(&self) -> Float {
        self.area
    }

    fn sample(&self, u: &[Float; 2]) -> (Point3f, Normal3f) {
        (self.corner + self.e1 * u[0] + self.e2 * u[1], self.n)
    }
}
