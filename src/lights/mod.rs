pub mod diffuse;
pub mod environment;
