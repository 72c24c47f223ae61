use std::ops::{Add, Sub, Mul};
use crate::core::common::Float;
use crate::core::geometry::vector::Vector3;

pub type Point2f = Point2<Float>;
pub type Point3f = Point3<Float>;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point2<T> {
    pub x: T,
    pub y: T
}

impl<T> Point2<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3<T> {
    pub x: T,
    pub y: T,
    pub z: T
}

impl<T> Point3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl Point3f {
    pub fn distance_squared(&self, p: &Self) -> Float {
        (*self - *p).length_squared()
    }
}

impl<T> Add<Vector3<T>> for Point3<T>
where T: Add<T, Output=T>
{
    type Output = Self;

    fn add(self, v: Vector3<T>) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl<T> Sub<Vector3<T>> for Point3<T>
where T: Sub<T, Output=T>
{
    type Output = Self;

    fn sub(self, v: Vector3<T>) -> Self {
        Self::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl<T> Sub for Point3<T>
where T: Sub<T, Output=T>
{
    type Output = Vector3<T>;

    fn sub(self, p: Self) -> Vector3<T> {
        Vector3::new(self.x - p.x, self.y - p.y, self.z - p.z)
    }
}

impl<T> Mul<T> for Point3<T>
where T: Copy + Mul<T, Output=T>
{
    type Output = Self;

    fn mul(self, s: T) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl<T> From<Vector3<T>> for Point3<T> {
    fn from(v: Vector3<T>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl<T> From<Point3<T>> for Vector3<T> {
    fn from(p: Point3<T>) -> Self {
        Vector3::new(p.x, p.y, p.z)
    }
}
