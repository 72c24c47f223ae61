use std::ops::{Add, Mul, AddAssign, MulAssign, Sub, Div, Index, Neg};
use num::Signed;
use crate::core::common::Float;
use crate::core::geometry::normal::Normal3;

pub type Vector3f = Vector3<Float>;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T
}

impl<T> Vector3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn length_squared(&self) -> T
    where T: Copy + Add<T, Output=T> + Mul<T, Output=T>
    {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(&self) -> T
    where T: num::Float
    {
        self.length_squared().sqrt()
    }

    pub fn dot(&self, v: &Self) -> T
    where T: Copy + Add<T, Output=T> + Mul<T, Output=T>
    {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    pub fn dot_norm(&self, n: &Normal3<T>) -> T
    where T: Copy + Add<T, Output=T> + Mul<T, Output=T>
    {
        self.x * n.x + self.y * n.y + self.z * n.z
    }

    pub fn abs_dot_norm(&self, n: &Normal3<T>) -> T
    where T: Copy + Signed
    {
        self.dot_norm(n).abs()
    }

    pub fn cross(&self, v: &Self) -> Self
    where T: Copy + Sub<T, Output=T> + Mul<T, Output=T>
    {
        Self {
            x: self.y * v.z - self.z * v.y,
            y: self.z * v.x - self.x * v.z,
            z: self.x * v.y - self.y * v.x
        }
    }
}

impl Vector3f {
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }
}

/// Builds two vectors that complete an orthonormal basis with `v1`.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if v1.x.abs() > v1.y.abs() {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);

    (v2, v3)
}

impl<T> Add for Vector3<T>
where T: Add<T, Output=T>
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T> AddAssign for Vector3<T>
where T: AddAssign
{
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl<T> Sub for Vector3<T>
where T: Sub<T, Output=T>
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<T> Mul<T> for Vector3<T>
where T: Copy + Mul<T, Output=T>
{
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl<T> MulAssign<T> for Vector3<T>
where T: Copy + MulAssign
{
    fn mul_assign(&mut self, rhs: T) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

impl Div<Float> for Vector3f {
    type Output = Self;

    fn div(self, rhs: Float) -> Self {
        let inv = 1.0 / rhs;

        Self::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl<T> Neg for Vector3<T>
where T: Neg<Output=T>
{
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T> Index<usize> for Vector3<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z
        }
    }
}

impl<T> From<Normal3<T>> for Vector3<T> {
    fn from(n: Normal3<T>) -> Self {
        Self::new(n.x, n.y, n.z)
    }
}
