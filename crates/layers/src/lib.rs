pub mod progress;
pub mod registry;

pub use progress::*;
pub use registry::*;
