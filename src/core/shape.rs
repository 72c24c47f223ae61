use enum_dispatch::enum_dispatch;
use crate::core::common::Float;
use crate::core::geometry::ray::Ray;
use crate::core::geometry::point::Point3f;
use crate::core::geometry::normal::Normal3f;
use crate::shapes::sphere::Sphere;
use crate::shapes::rectangle::Rectangle;

#[derive(Debug, Copy, Clone)]
pub struct ShapeHit {
    pub t: Float,
    pub p: Point3f,
    pub n: Normal3f
}

#[enum_dispatch]
pub trait Shape {
    /// Nearest hit with `t` in the open interval `(r.t_min, r.t_max)`.
    fn intersect(&self, r: &Ray) -> Option<ShapeHit>;
    fn area(&self) -> Float;
    /// Uniform-by-area point and its geometric normal.
    fn sample(&self, u: &[Float; 2]) -> (Point3f, Normal3f);
}

#[enum_dispatch(Shape)]
#[derive(Debug, Clone)]
pub enum Shapes {
    Sphere,
    Rectangle
}
