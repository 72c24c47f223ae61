use crate::core::common::{Float, PI};
use crate::core::geometry::ray::Ray;
use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::normal::Normal3f;
use crate::core::shape::{Shape, ShapeHit};
use crate::core::sampling::uniform_sample_sphere;

#[derive(Debug, Copy, Clone)]
pub struct Sphere {
    pub center  : Point3f,
    pub radius  : Float
}

impl Sphere {
    pub fn new(center: Point3f, radius: Float) -> Self {
        Self { center, radius }
    }
}

impl Shape for Sphere {
    fn intersect(&self, r: &Ray) -> Option<ShapeHit> {
        let oc = r.o - self.center;
        let a = r.d.length_squared();
        let b = 2.0 * oc.dot(&r.d);
        let c = oc.length_squared() - self.radius * self.radius;
        let discrim = b * b - 4.0 * a * c;

        if discrim < 0.0 { return None; }

        let root = discrim.sqrt();
        let q = if b < 0.0 { -0.5 * (b - root) } else { -0.5 * (b + root) };
        let (mut t0, mut t1) = (q / a, c / q);
        if t0 > t1 { std::mem::swap(&mut t0, &mut t1); }

        let t = if t0 > r.t_min && t0 < r.t_max {
            t0
        } else if t1 > r.t_min && t1 < r.t_max {
            t1
        } else {
            return None;
        };

        let p = r.find_point(t);
        let n = Normal3f::from((p - self.center) / self.radius);

        Some(ShapeHit { t, p, n })
    }

    fn area(&self) -> Float {
        4.0 * PI * self.radius * self.radius
    }

    fn sample(&self, u: &[Float; 2]) -> (Point3f, Normal3f) {
        let d: Vector3f = uniform_sample_sphere(u);

        (self.center + d * self.radius, Normal3f::from(d))
    }
}
