use std::ops::{Mul, Neg};
use crate::core::common::Float;
use crate::core::geometry::vector::Vector3;

pub type Normal3f = Normal3<Float>;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Normal3<T> {
    pub x: T,
    pub y: T,
    pub z: T
}

impl<T> Normal3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl Normal3f {
    pub fn normalize(&self) -> Self {
        let inv = 1.0 / (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();

        Self::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl<T> Neg for Normal3<T>
where T: Neg<Output=T>
{
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T> Mul<T> for Normal3<T>
where T: Copy + Mul<T, Output=T>
{
    type Output = Self;

    fn mul(self, s: T) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl<T> From<Vector3<T>> for Normal3<T> {
    fn from(v: Vector3<T>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
