pub mod matte;
pub mod mirror;
pub mod glass;
