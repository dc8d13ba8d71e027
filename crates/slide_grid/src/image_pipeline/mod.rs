pub mod fit;
pub mod loader;
pub mod resolution;
