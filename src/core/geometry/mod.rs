pub mod vector;
pub mod point;
pub mod normal;
pub mod ray;
pub mod frame;
