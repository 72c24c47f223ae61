#[macro_use]
pub mod stats;
pub mod common;
pub mod error;
pub mod geometry;
pub mod spectrum;
pub mod rng;
pub mod sampling;
pub mod parallel;
pub mod memory;
pub mod ddf;
pub mod reflection;
pub mod interaction;
pub mod shape;
pub mod material;
pub mod light;
pub mod camera;
pub mod scene;
pub mod sampler;
pub mod sensor;
pub mod imageio;
