pub mod bounds;
pub mod proj;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use proj::*;
