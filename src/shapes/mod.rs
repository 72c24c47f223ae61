pub mod sphere;
pub mod rectangle;
