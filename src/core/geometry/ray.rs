use std::fmt::{Display, Formatter, Result};
use crate::core::common::{Float, INFINITY, RAY_EPSILON};
use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;

#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub o       : Point3f,
    pub d       : Vector3f,
    pub t_min   : Float,
    pub t_max   : Float,
    pub time    : Float
}

impl Ray {
    pub fn new(o: &Point3f, d: &Vector3f, t_min: Float, t_max: Float, time: Float) -> Self {
        Self { o: *o, d: *d, t_min, t_max, time }
    }

    /// A ray leaving a surface, offset by `RAY_EPSILON` to skip its own origin.
    pub fn spawn(o: &Point3f, d: &Vector3f, time: Float) -> Self {
        Self::new(o, d, RAY_EPSILON, INFINITY, time)
    }

    pub fn find_point(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}

impl Display for Ray {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f, "[ o=[{}, {}, {}], d=[{}, {}, {}], t=[{}, {}], time={} ]",
            self.o.x, self.o.y, self.o.z, self.d.x, self.d.y, self.d.z,
            self.t_min, self.t_max, self.time)
    }
}
